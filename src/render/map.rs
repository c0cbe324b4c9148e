use crate::{
    animation::ease::Ease,
    foundation::{
        core::{GeoBounds, Insets, LngLat, Millis},
        error::GeostoryResult,
    },
};

/// Handle to a line drawn on a [`MapSurface`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

/// Stroke style of a path segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    /// CSS colour.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity in `0..=1`.
    pub opacity: f64,
    /// SVG dash pattern; `None` draws a solid line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl LineStyle {
    /// Segment of the event currently shown.
    pub fn active() -> Self {
        Self {
            color: "#c0392b".to_string(),
            weight: 3.0,
            opacity: 0.9,
            dash: Some("8, 8".to_string()),
        }
    }

    /// Segments of earlier events.
    pub fn trail() -> Self {
        Self {
            color: "#85c1e9".to_string(),
            weight: 3.0,
            opacity: 0.6,
            dash: Some("8, 8".to_string()),
        }
    }

    /// Attention style used when an event is selected from the detail panel.
    pub fn highlight() -> Self {
        Self {
            color: "#e74c3c".to_string(),
            weight: 5.0,
            opacity: 0.9,
            dash: None,
        }
    }

    /// Same style with opacity scaled by `factor`.
    pub fn dimmed(&self, factor: f64) -> Self {
        Self {
            opacity: self.opacity * factor,
            ..self.clone()
        }
    }
}

/// Map widget capability the engine drives.
///
/// Durations of zero mean "jump". Every call may fail; callers log the failure and carry on.
pub trait MapSurface {
    /// Zoom level right now.
    fn current_zoom(&self) -> f64;

    /// Centre on `center` at `zoom`, panning over `duration`.
    fn set_view(&mut self, center: LngLat, zoom: f64, duration: Millis) -> GeostoryResult<()>;

    /// Fit `bounds` inside the viewport minus `padding`, never zooming past `max_zoom`.
    fn fit_bounds(
        &mut self,
        bounds: GeoBounds,
        padding: Insets,
        max_zoom: f64,
        duration: Millis,
    ) -> GeostoryResult<()>;

    /// Add a polyline, progressively drawn over `duration`.
    fn draw_line(
        &mut self,
        points: &[LngLat],
        style: &LineStyle,
        duration: Millis,
        ease: Ease,
    ) -> GeostoryResult<LayerId>;

    /// Change a line's style. `replay` re-runs the draw animation over the given duration.
    fn restyle_line(
        &mut self,
        layer: LayerId,
        style: &LineStyle,
        replay: Option<Millis>,
    ) -> GeostoryResult<()>;

    /// Start the fade-and-shrink animation. The layer stays on the map until removed.
    fn erase_line(&mut self, layer: LayerId, duration: Millis) -> GeostoryResult<()>;

    /// Take a line off the map.
    fn remove_layer(&mut self, layer: LayerId) -> GeostoryResult<()>;
}

/// Log a failed map call and swallow it.
pub(crate) fn log_map_err<T>(op: &'static str, res: GeostoryResult<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(op, error = %e, "map operation failed, skipping");
            None
        }
    }
}
