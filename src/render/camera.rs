use crate::{
    foundation::{
        core::{GeoBounds, Insets, LngLat, Millis},
        error::GeostoryResult,
    },
    render::map::MapSurface,
    settings::{config::PlaybackConfig, speed::SpeedController},
    trajectory::model::Trajectory,
};

/// A camera instruction for the map.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CameraMove {
    /// Centre on a point at a zoom level.
    Center {
        /// Target centre.
        center: LngLat,
        /// Target zoom.
        zoom: f64,
        /// Pan length; zero jumps.
        duration: Millis,
    },
    /// Fit a bounding box into the viewport.
    Fit {
        /// Box to show.
        bounds: GeoBounds,
        /// Viewport padding in pixels.
        padding: Insets,
        /// Zoom cap for small boxes.
        max_zoom: f64,
        /// Pan length; zero jumps.
        duration: Millis,
    },
}

impl CameraMove {
    /// Issue the move on `map`.
    pub fn apply(self, map: &mut dyn MapSurface) -> GeostoryResult<()> {
        match self {
            Self::Center {
                center,
                zoom,
                duration,
            } => map.set_view(center, zoom, duration),
            Self::Fit {
                bounds,
                padding,
                max_zoom,
                duration,
            } => map.fit_bounds(bounds, padding, max_zoom, duration),
        }
    }
}

/// Where the camera should go for the event at `target`.
///
/// Centres on the event's end when it has one. Otherwise fits the previous event's end
/// together with this event's start, transit points and end. Non-animated moves jump.
pub fn follow_move(
    trajectory: &Trajectory,
    target: usize,
    previous: usize,
    animated: bool,
    current_zoom: f64,
    speed: &SpeedController,
    cfg: &PlaybackConfig,
) -> GeostoryResult<Option<CameraMove>> {
    let Some(ev) = trajectory.get(target) else {
        return Ok(None);
    };
    let timed = |d: Millis| if animated { d } else { Millis::ZERO };

    if let Some(end) = ev.end {
        return Ok(Some(CameraMove::Center {
            center: end,
            zoom: current_zoom.max(cfg.follow_min_zoom),
            duration: timed(speed.camera_pan()),
        }));
    }

    let mut pts: Vec<LngLat> = Vec::new();
    pts.extend(trajectory.get(previous).and_then(|p| p.end));
    pts.extend(ev.start);
    pts.extend(ev.transit.iter().copied());
    if pts.is_empty() {
        return Ok(None);
    }
    let bounds = GeoBounds::around(&pts, cfg.single_point_offset)?;
    Ok(Some(CameraMove::Fit {
        bounds,
        padding: cfg.follow_padding,
        max_zoom: cfg.max_fit_zoom,
        duration: timed(speed.camera_follow()),
    }))
}

/// Fit every given coordinate with uniform padding, e.g. the full route or one highlighted
/// segment.
pub fn fit_move(
    coords: &[LngLat],
    duration: Millis,
    cfg: &PlaybackConfig,
) -> GeostoryResult<Option<CameraMove>> {
    if coords.is_empty() {
        return Ok(None);
    }
    let bounds = GeoBounds::around(coords, cfg.single_point_offset)?;
    Ok(Some(CameraMove::Fit {
        bounds,
        padding: cfg.route_padding,
        max_zoom: cfg.max_fit_zoom,
        duration,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
