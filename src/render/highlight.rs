use crate::{
    foundation::core::Millis,
    render::map::{LayerId, LineStyle, MapSurface, log_map_err},
};

/// A segment shown in the attention style, with the style to put back afterwards.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Highlighted event.
    pub event_index: usize,
    /// Layer of its segment.
    pub layer: LayerId,
    /// Style the segment had before highlighting.
    pub original: LineStyle,
}

/// What a selection did.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// The event was already highlighted; it has been cleared.
    Cleared,
    /// The event is now highlighted. `dimmed` is a prior highlight that was quick-cleared and
    /// must be restored later.
    Highlighted {
        /// Quick-cleared highlight awaiting restore.
        dimmed: Option<Highlight>,
    },
    /// The event has no segment on the map.
    Missing,
}

/// At most one highlighted segment at a time.
#[derive(Debug, Default)]
pub struct PathHighlighter {
    current: Option<Highlight>,
}

impl PathHighlighter {
    /// No highlight.
    pub fn new() -> Self {
        Self::default()
    }

    /// The highlight, if any.
    pub fn current(&self) -> Option<&Highlight> {
        self.current.as_ref()
    }

    /// Event of the highlight, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|h| h.event_index)
    }

    /// Toggle the highlight on `event_index`, whose segment (if drawn) is `segment`.
    pub fn select(
        &mut self,
        map: &mut dyn MapSurface,
        event_index: usize,
        segment: Option<(LayerId, LineStyle)>,
        replay: Millis,
        dim_factor: f64,
    ) -> SelectOutcome {
        if self.current_index() == Some(event_index) {
            self.clear(map, replay);
            return SelectOutcome::Cleared;
        }
        let dimmed = self.quick_clear(map, dim_factor);

        let Some((layer, original)) = segment else {
            return match dimmed {
                Some(d) => SelectOutcome::Highlighted { dimmed: Some(d) },
                None => SelectOutcome::Missing,
            };
        };
        log_map_err(
            "restyle_line",
            map.restyle_line(layer, &LineStyle::highlight(), Some(replay)),
        );
        self.current = Some(Highlight {
            event_index,
            layer,
            original,
        });
        tracing::debug!(event_index, "path highlighted");
        SelectOutcome::Highlighted { dimmed }
    }

    /// Put the original style back and replay the draw animation.
    pub fn clear(&mut self, map: &mut dyn MapSurface, replay: Millis) -> Option<Highlight> {
        let h = self.current.take()?;
        restore(map, &h, replay);
        Some(h)
    }

    /// Drop the highlight without touching the map, e.g. when its layer is gone.
    pub fn forget(&mut self) -> Option<Highlight> {
        self.current.take()
    }

    /// Dim the current highlight to `factor` of its original opacity. The caller restores it
    /// with [`restore`] after a short delay.
    pub fn quick_clear(&mut self, map: &mut dyn MapSurface, factor: f64) -> Option<Highlight> {
        let h = self.current.take()?;
        log_map_err(
            "restyle_line",
            map.restyle_line(h.layer, &h.original.dimmed(factor), None),
        );
        Some(h)
    }
}

/// Put `h`'s original style back and replay its draw over `replay`.
pub fn restore(map: &mut dyn MapSurface, h: &Highlight, replay: Millis) {
    log_map_err(
        "restyle_line",
        map.restyle_line(h.layer, &h.original, Some(replay)),
    );
}
