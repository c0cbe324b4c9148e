use crate::{
    aggregate::marker::LocationMarker,
    foundation::core::{LngLat, Millis},
    playback::navigator::Direction,
    render::{camera::CameraMove, paths::SegmentView},
    trajectory::model::Event,
};

/// Notifications for the presentation layer, drained with
/// [`crate::PlaybackSession::take_effects`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum PlaybackEffect {
    /// The shown event changed.
    IndexChanged {
        /// New index.
        index: usize,
        /// Index shown before.
        previous: usize,
        /// Which way the timeline moved.
        direction: Direction,
    },
    /// Location markers were rebuilt.
    MarkersUpdated {
        /// Number of markers.
        count: usize,
        /// Coordinate of the current-location marker, if any.
        current: Option<LngLat>,
    },
    /// The set of drawn path segments changed.
    PathsUpdated {
        /// Number of drawn segments.
        segments: usize,
        /// Event index of the active segment.
        active: Option<usize>,
    },
    /// The camera was moved.
    CameraMoved(CameraMove),
    /// Autoplay started or stopped.
    PlayStateChanged {
        /// True while autoplaying.
        playing: bool,
    },
    /// A path highlight was set or cleared.
    HighlightChanged {
        /// Highlighted event, or `None` once cleared.
        event_index: Option<usize>,
    },
    /// The in-flight animation finished and the lock was released.
    AnimationSettled {
        /// Index the animation targeted.
        index: usize,
    },
    /// Speed or camera settings changed.
    SettingsChanged {
        /// Autoplay interval.
        play_speed: Millis,
        /// Path draw duration.
        path_duration: Millis,
        /// Camera speed level.
        camera_speed_level: usize,
        /// Camera follow toggle.
        camera_follow: bool,
    },
    /// Show a decorative overlay message.
    DecorativeMessage {
        /// Message text.
        text: String,
    },
    /// A trajectory was loaded.
    DatasetLoaded {
        /// Number of events.
        events: usize,
    },
}

/// Everything needed to draw the viewer at one moment.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    /// Event being shown.
    pub index: usize,
    /// Event shown before the last navigation.
    pub previous_index: usize,
    /// Trajectory length.
    pub total_events: usize,
    /// Share of the timeline reached, in `(0, 1]`.
    pub progress: f64,
    /// The event being shown.
    pub event: Option<Event>,
    /// Location markers as of `index`.
    pub markers: Vec<LocationMarker>,
    /// Drawn path segments.
    pub segments: Vec<SegmentView>,
    /// Highlighted event, if any.
    pub highlight: Option<usize>,
    /// Autoplay running.
    pub is_playing: bool,
    /// Slider drag in progress.
    pub is_dragging: bool,
    /// A path animation holds the lock.
    pub is_animating: bool,
    /// Camera follows each move.
    pub camera_follow: bool,
    /// Autoplay interval.
    pub play_speed: Millis,
    /// Display label for `play_speed`.
    pub play_speed_label: String,
    /// Path draw duration.
    pub path_duration: Millis,
    /// Display label of the camera speed level.
    pub camera_speed_label: &'static str,
}
