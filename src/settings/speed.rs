use crate::{foundation::core::Millis, settings::config::PlaybackConfig};

/// One camera speed level: how long the follow fit and the centring pan take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedLevel {
    /// Display label.
    pub label: &'static str,
    /// Duration of the fit that follows a move.
    pub camera_follow: Millis,
    /// Duration of the centring pan.
    pub camera_pan: Millis,
}

/// Camera speed levels, fastest first.
pub const SPEED_LEVELS: [SpeedLevel; 4] = [
    SpeedLevel {
        label: "Very fast",
        camera_follow: Millis(600),
        camera_pan: Millis(400),
    },
    SpeedLevel {
        label: "Normal",
        camera_follow: Millis(2000),
        camera_pan: Millis(1500),
    },
    SpeedLevel {
        label: "Slow",
        camera_follow: Millis(3500),
        camera_pan: Millis(2800),
    },
    SpeedLevel {
        label: "Very slow",
        camera_follow: Millis(5000),
        camera_pan: Millis(4000),
    },
];

/// Level used when nothing valid is stored.
pub const DEFAULT_SPEED_LEVEL: usize = 1;

/// Level at `index`, if it exists.
pub fn speed_level(index: usize) -> Option<&'static SpeedLevel> {
    SPEED_LEVELS.get(index)
}

/// Display label for an autoplay interval.
pub fn play_speed_label(speed: Millis) -> String {
    let named = match speed.0 {
        500 => "Very fast",
        1000 => "Fast",
        2000 => "Normal",
        3000 => "Slow",
        5000 => "Very slow",
        other => return format!("{other}ms"),
    };
    named.to_string()
}

/// Derived timing for playback: play speed, path-draw duration and camera durations.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedController {
    play_speed: Millis,
    path_duration: Millis,
    level: usize,
    #[serde(skip)]
    min_path: Millis,
    #[serde(skip)]
    buffer: Millis,
    #[serde(skip)]
    override_slack: Millis,
}

impl SpeedController {
    /// Controller at the configured play speed. An invalid `level` falls back to the default.
    pub fn new(cfg: &PlaybackConfig, level: usize) -> Self {
        let level = if speed_level(level).is_some() {
            level
        } else {
            tracing::warn!(level, "invalid camera speed level, using default");
            DEFAULT_SPEED_LEVEL
        };
        Self {
            play_speed: cfg.default_play_speed,
            path_duration: cfg.path_duration_for(cfg.default_play_speed),
            level,
            min_path: cfg.min_path_duration,
            buffer: cfg.path_duration_buffer,
            override_slack: cfg.path_override_slack,
        }
    }

    /// Autoplay interval.
    pub fn play_speed(&self) -> Millis {
        self.play_speed
    }

    /// Path draw duration.
    pub fn path_duration(&self) -> Millis {
        self.path_duration
    }

    /// Camera speed level index.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Follow-fit duration of the current level.
    pub fn camera_follow(&self) -> Millis {
        SPEED_LEVELS[self.level].camera_follow
    }

    /// Centring pan duration of the current level.
    pub fn camera_pan(&self) -> Millis {
        SPEED_LEVELS[self.level].camera_pan
    }

    /// Label of the current level.
    pub fn level_label(&self) -> &'static str {
        SPEED_LEVELS[self.level].label
    }

    /// Wait between autoplay steps: `max(play speed, path duration + grace)`.
    pub fn autoplay_interval(&self, grace: Millis) -> Millis {
        self.play_speed.max(self.path_duration + grace)
    }

    /// Set the play speed and re-derive the path duration from it.
    pub fn set_play_speed(&mut self, speed: Millis) {
        self.play_speed = speed;
        self.path_duration = speed.saturating_sub(self.buffer).max(self.min_path);
        tracing::debug!(
            speed = speed.0,
            path = self.path_duration.0,
            "play speed changed"
        );
    }

    /// Override the path duration. A play speed shorter than the new duration is bumped to
    /// `duration + slack`.
    pub fn set_path_duration(&mut self, duration: Millis) {
        self.path_duration = duration;
        if self.play_speed < duration {
            self.play_speed = duration + self.override_slack;
        }
    }

    /// Select a camera speed level. Out-of-range levels are logged and ignored.
    pub fn set_level(&mut self, level: usize) -> bool {
        if speed_level(level).is_none() {
            tracing::warn!(level, "invalid camera speed level ignored");
            return false;
        }
        self.level = level;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/speed.rs"]
mod tests;
