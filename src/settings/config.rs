use std::path::Path;

use crate::foundation::{
    core::{Insets, Millis},
    error::{GeostoryError, GeostoryResult},
};

/// Timing and camera constants for a playback session.
///
/// User choices that persist between runs live in [`crate::Preferences`] instead.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Added to a path animation before non-user navigation is accepted again.
    pub lock_grace: Millis,
    /// Added to the path duration when computing the autoplay interval.
    pub autoplay_grace: Millis,
    /// Autoplay interval at startup.
    pub default_play_speed: Millis,
    /// Floor for the derived path duration.
    pub min_path_duration: Millis,
    /// Subtracted from the play speed to derive the path duration.
    pub path_duration_buffer: Millis,
    /// Play speed becomes `path + slack` when an explicit path duration exceeds it.
    pub path_override_slack: Millis,
    /// How long a highlight stays before reverting.
    pub highlight_duration: Millis,
    /// How long a replaced highlight stays dimmed before its style returns.
    pub highlight_quick_clear: Millis,
    /// Opacity factor applied to a replaced highlight.
    pub highlight_dim_factor: f64,
    /// How long a decorative message blocks the next one.
    pub overlay_reset: Millis,
    /// Minimum zoom when centring on a move.
    pub follow_min_zoom: f64,
    /// Zoom cap when fitting a box.
    pub max_fit_zoom: f64,
    /// Viewport padding when following a move.
    pub follow_padding: Insets,
    /// Viewport padding when showing the full route.
    pub route_padding: Insets,
    /// Degrees added around a bounding box that collapses to a single point.
    pub single_point_offset: f64,
    /// Zoom the map starts at.
    pub initial_zoom: f64,
    /// Overlay messages, shown round-robin.
    pub decorative_messages: Vec<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            lock_grace: Millis(100),
            autoplay_grace: Millis(200),
            default_play_speed: Millis(1000),
            min_path_duration: Millis(200),
            path_duration_buffer: Millis(300),
            path_override_slack: Millis(500),
            highlight_duration: Millis(4000),
            highlight_quick_clear: Millis(200),
            highlight_dim_factor: 0.3,
            overlay_reset: Millis(5000),
            follow_min_zoom: 6.0,
            max_fit_zoom: 8.0,
            // left, top, right, bottom
            follow_padding: Insets::new(50.0, 50.0, 50.0, 100.0),
            route_padding: Insets::uniform(50.0),
            single_point_offset: 0.1,
            initial_zoom: 5.0,
            decorative_messages: vec![
                "俱往矣，数风流人物，还看今朝".to_string(),
                "一万年太久，只争朝夕".to_string(),
                "雄关漫道真如铁，而今迈步从头越".to_string(),
                "江山如此多娇，引无数英雄竞折腰".to_string(),
            ],
        }
    }
}

impl PlaybackConfig {
    /// Reject zero timings, out-of-range factors and non-finite zooms or paddings.
    pub fn validate(&self) -> GeostoryResult<()> {
        if self.default_play_speed.is_zero() {
            return Err(GeostoryError::validation(
                "default_play_speed must be non-zero",
            ));
        }
        if self.min_path_duration.is_zero() {
            return Err(GeostoryError::validation(
                "min_path_duration must be non-zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.highlight_dim_factor) {
            return Err(GeostoryError::validation(
                "highlight_dim_factor must be in [0, 1]",
            ));
        }
        if !self.follow_min_zoom.is_finite()
            || !self.max_fit_zoom.is_finite()
            || !self.initial_zoom.is_finite()
        {
            return Err(GeostoryError::validation("zoom levels must be finite"));
        }
        if !self.single_point_offset.is_finite() || self.single_point_offset <= 0.0 {
            return Err(GeostoryError::validation(
                "single_point_offset must be positive",
            ));
        }
        for (name, p) in [
            ("follow_padding", self.follow_padding),
            ("route_padding", self.route_padding),
        ] {
            if [p.x0, p.y0, p.x1, p.y1]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
            {
                return Err(GeostoryError::validation(format!(
                    "{name} must be finite and non-negative"
                )));
            }
        }
        Ok(())
    }

    /// Path-draw duration for a play speed: `max(min_path_duration, speed - buffer)`.
    pub fn path_duration_for(&self, play_speed: Millis) -> Millis {
        play_speed
            .saturating_sub(self.path_duration_buffer)
            .max(self.min_path_duration)
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GeostoryResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| GeostoryError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config file.
    pub fn from_json_path(path: &Path) -> GeostoryResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/config.rs"]
mod tests;
