use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{GeoBounds, Insets, LngLat, Millis},
        error::{GeostoryError, GeostoryResult},
    },
    render::map::{LayerId, LineStyle, MapSurface},
};

/// One call made against a [`RecordingMap`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum MapCommand {
    /// [`MapSurface::set_view`].
    SetView {
        /// Target centre.
        center: LngLat,
        /// Target zoom.
        zoom: f64,
        /// Pan length.
        duration: Millis,
    },
    /// [`MapSurface::fit_bounds`].
    FitBounds {
        /// Minimum corner of the box.
        south_west: LngLat,
        /// Maximum corner of the box.
        north_east: LngLat,
        /// Viewport padding.
        padding: Insets,
        /// Zoom cap.
        max_zoom: f64,
        /// Pan length.
        duration: Millis,
    },
    /// [`MapSurface::draw_line`].
    DrawLine {
        /// Layer handed back to the caller.
        layer: LayerId,
        /// Polyline vertices.
        points: Vec<LngLat>,
        /// Stroke style.
        style: LineStyle,
        /// Draw length.
        duration: Millis,
        /// Draw curve.
        ease: Ease,
    },
    /// [`MapSurface::restyle_line`].
    RestyleLine {
        /// Restyled layer.
        layer: LayerId,
        /// New style.
        style: LineStyle,
        /// Draw replay length, if replayed.
        #[serde(skip_serializing_if = "Option::is_none")]
        replay: Option<Millis>,
    },
    /// [`MapSurface::erase_line`].
    EraseLine {
        /// Erased layer.
        layer: LayerId,
        /// Erase length.
        duration: Millis,
    },
    /// [`MapSurface::remove_layer`].
    RemoveLayer {
        /// Removed layer.
        layer: LayerId,
    },
}

/// A line currently on a [`RecordingMap`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedLine {
    /// Polyline vertices.
    pub points: Vec<LngLat>,
    /// Latest style.
    pub style: LineStyle,
    /// An erase animation was started.
    pub erasing: bool,
}

/// In-memory [`MapSurface`] that records every command and tracks the live layers.
///
/// Fitting a box picks the largest whole zoom at which the box spans at most one world
/// width, capped at the requested maximum.
#[derive(Clone, Debug)]
pub struct RecordingMap {
    zoom: f64,
    center: LngLat,
    next_layer: u64,
    lines: BTreeMap<LayerId, RecordedLine>,
    commands: Vec<MapCommand>,
    fail_fit_bounds: bool,
}

impl RecordingMap {
    /// Empty map viewing `center` at `zoom`.
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            zoom,
            center,
            next_layer: 1,
            lines: BTreeMap::new(),
            commands: Vec::new(),
            fail_fit_bounds: false,
        }
    }

    /// Make every `fit_bounds` call fail.
    pub fn fail_fit_bounds(mut self, fail: bool) -> Self {
        self.fail_fit_bounds = fail;
        self
    }

    /// Current view centre.
    pub fn center(&self) -> LngLat {
        self.center
    }

    /// Every command so far, oldest first.
    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Layers not yet removed, in id order.
    pub fn live_layers(&self) -> Vec<LayerId> {
        self.lines.keys().copied().collect()
    }

    /// Recorded state of `layer`, if still on the map.
    pub fn line(&self, layer: LayerId) -> Option<&RecordedLine> {
        self.lines.get(&layer)
    }

    fn line_mut(&mut self, layer: LayerId) -> GeostoryResult<&mut RecordedLine> {
        self.lines
            .get_mut(&layer)
            .ok_or_else(|| GeostoryError::render(format!("unknown layer {}", layer.0)))
    }
}

impl Default for RecordingMap {
    fn default() -> Self {
        Self::new(LngLat::new(0.0, 0.0), 5.0)
    }
}

impl MapSurface for RecordingMap {
    fn current_zoom(&self) -> f64 {
        self.zoom
    }

    fn set_view(&mut self, center: LngLat, zoom: f64, duration: Millis) -> GeostoryResult<()> {
        if !center.is_finite() || !zoom.is_finite() {
            return Err(GeostoryError::render("set_view with non-finite arguments"));
        }
        self.center = center;
        self.zoom = zoom;
        self.commands.push(MapCommand::SetView {
            center,
            zoom,
            duration,
        });
        Ok(())
    }

    fn fit_bounds(
        &mut self,
        bounds: GeoBounds,
        padding: Insets,
        max_zoom: f64,
        duration: Millis,
    ) -> GeostoryResult<()> {
        if self.fail_fit_bounds {
            return Err(GeostoryError::render("fit_bounds rejected"));
        }
        let span = bounds.0.width().max(bounds.0.height());
        let fit = if span > 0.0 {
            (360.0 / span).log2().floor()
        } else {
            max_zoom
        };
        self.zoom = fit.min(max_zoom).max(0.0);
        self.center = bounds.center();
        self.commands.push(MapCommand::FitBounds {
            south_west: bounds.south_west(),
            north_east: bounds.north_east(),
            padding,
            max_zoom,
            duration,
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        points: &[LngLat],
        style: &LineStyle,
        duration: Millis,
        ease: Ease,
    ) -> GeostoryResult<LayerId> {
        if points.len() < 2 {
            return Err(GeostoryError::render("a line needs at least two points"));
        }
        let layer = LayerId(self.next_layer);
        self.next_layer += 1;
        self.lines.insert(
            layer,
            RecordedLine {
                points: points.to_vec(),
                style: style.clone(),
                erasing: false,
            },
        );
        self.commands.push(MapCommand::DrawLine {
            layer,
            points: points.to_vec(),
            style: style.clone(),
            duration,
            ease,
        });
        Ok(layer)
    }

    fn restyle_line(
        &mut self,
        layer: LayerId,
        style: &LineStyle,
        replay: Option<Millis>,
    ) -> GeostoryResult<()> {
        self.line_mut(layer)?.style = style.clone();
        self.commands.push(MapCommand::RestyleLine {
            layer,
            style: style.clone(),
            replay,
        });
        Ok(())
    }

    fn erase_line(&mut self, layer: LayerId, duration: Millis) -> GeostoryResult<()> {
        self.line_mut(layer)?.erasing = true;
        self.commands.push(MapCommand::EraseLine { layer, duration });
        Ok(())
    }

    fn remove_layer(&mut self, layer: LayerId) -> GeostoryResult<()> {
        if self.lines.remove(&layer).is_none() {
            return Err(GeostoryError::render(format!("unknown layer {}", layer.0)));
        }
        self.commands.push(MapCommand::RemoveLayer { layer });
        Ok(())
    }
}
