//! Geostory plays a biographical trajectory back on a map.
//!
//! A trajectory is an ordered list of dated events, each a birth, an in-place activity or a
//! move between places. The engine turns "show event `i`" into animated path segments,
//! visit-weighted location markers and camera moves, driven by a deterministic virtual clock:
//!
//! - Load a [`Trajectory`] (from JSON with [`load_trajectory`], resolving places through a
//!   [`Gazetteer`])
//! - Create a [`PlaybackSession`] over any [`MapSurface`] ([`RecordingMap`] records commands)
//! - Navigate, autoplay, drag and highlight, passing the current time to every call
//! - Drain [`PlaybackEffect`]s or snapshot a [`SceneFrame`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

pub(crate) mod aggregate;
pub(crate) mod animation;
pub(crate) mod fingerprint;
pub(crate) mod foundation;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod settings;
pub(crate) mod trajectory;

pub use crate::foundation::core::{CoordKey, GeoBounds, Insets, LngLat, Millis};
pub use crate::foundation::error::{GeostoryError, GeostoryResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::scheduler::{Scheduler, TimerId};
pub use crate::animation::task::{AnimationKind, AnimationLock, AnimationTask};

pub use crate::trajectory::catalog::{DatasetCatalog, DatasetEntry};
pub use crate::trajectory::gazetteer::{
    DOMESTIC_COUNTRY, Gazetteer, RegionEntry, RegionsFile, ResolvedLocation, UNKNOWN_LOCATION,
    format_location_name, full_location_path,
};
pub use crate::trajectory::loader::{
    load_gazetteer, load_trajectory, parse_trajectory, resolve_trajectory,
};
pub use crate::trajectory::model::{
    Event, LocationInfo, MovementType, RawCoordinates, RawEvent, RawTrajectory, Trajectory,
};
pub use crate::trajectory::stats::TrajectoryStats;

pub use crate::aggregate::groups::{
    LocationGroup, VisitRecord, VisitRole, VisitSummary, group_events_by_location,
};
pub use crate::aggregate::marker::{
    LocationMarker, MarkerKind, VisitBucket, build_marker, build_markers, extract_city_name,
};

pub use crate::settings::config::PlaybackConfig;
pub use crate::settings::prefs::{
    JsonFileStore, KEY_CAMERA_FOLLOW, KEY_CAMERA_SPEED_LEVEL, MemoryStore, PreferenceStore,
    Preferences,
};
pub use crate::settings::speed::{
    DEFAULT_SPEED_LEVEL, SPEED_LEVELS, SpeedController, SpeedLevel, play_speed_label,
    speed_level,
};

pub use crate::render::camera::{CameraMove, fit_move, follow_move};
pub use crate::render::highlight::{Highlight, PathHighlighter, SelectOutcome};
pub use crate::render::map::{LayerId, LineStyle, MapSurface};
pub use crate::render::paths::{PathRenderer, SegmentRole, SegmentView};
pub use crate::render::recording::{MapCommand, RecordedLine, RecordingMap};

pub use crate::playback::effects::{PlaybackEffect, SceneFrame};
pub use crate::playback::keyboard::{Key, KeyAction, KeyContext, action_for};
pub use crate::playback::navigator::{Direction, GoTo, PlaybackState, Transition, arbitrate};
pub use crate::playback::session::PlaybackSession;

pub use crate::fingerprint::{SceneFingerprint, fingerprint_frame};
