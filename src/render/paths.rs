use std::collections::BTreeMap;

use crate::{
    animation::{
        ease::Ease,
        task::{AnimationKind, AnimationTask},
    },
    foundation::core::{LngLat, Millis},
    render::map::{LayerId, LineStyle, MapSurface, log_map_err},
    trajectory::model::Trajectory,
};

/// How a drawn segment is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentRole {
    /// Segment of the event being shown.
    Active,
    /// Segment of an earlier event.
    Trail,
}

impl SegmentRole {
    /// Line style for the role.
    pub fn style(self) -> LineStyle {
        match self {
            Self::Active => LineStyle::active(),
            Self::Trail => LineStyle::trail(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DrawnSegment {
    layer: LayerId,
    role: SegmentRole,
    points: Vec<LngLat>,
}

/// A segment as seen by the presentation layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentView {
    /// Event the segment belongs to.
    pub event_index: usize,
    /// Current styling role.
    pub role: SegmentRole,
    /// Start, transit points and end.
    pub points: Vec<LngLat>,
}

/// Path segments currently on the map, keyed by event index.
///
/// After any render the set holds exactly the qualifying segments of events `0..=target`.
/// Segments being erased have already left the set; their layers are removed once the erase
/// animation finishes.
#[derive(Debug, Default)]
pub struct PathRenderer {
    segments: BTreeMap<usize, DrawnSegment>,
    erasing: Vec<LayerId>,
}

impl PathRenderer {
    /// Nothing drawn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer of `event_index`'s segment.
    pub fn layer_for(&self, event_index: usize) -> Option<LayerId> {
        self.segments.get(&event_index).map(|s| s.layer)
    }

    /// Role of `event_index`'s segment.
    pub fn role_of(&self, event_index: usize) -> Option<SegmentRole> {
        self.segments.get(&event_index).map(|s| s.role)
    }

    /// Vertices of `event_index`'s segment.
    pub fn points_of(&self, event_index: usize) -> Option<&[LngLat]> {
        self.segments.get(&event_index).map(|s| s.points.as_slice())
    }

    /// True if `layer` belongs to a segment in the set.
    pub fn contains_layer(&self, layer: LayerId) -> bool {
        self.segments.values().any(|s| s.layer == layer)
    }

    /// Event of the active segment.
    pub fn active(&self) -> Option<usize> {
        self.segments
            .iter()
            .find(|(_, s)| s.role == SegmentRole::Active)
            .map(|(i, _)| *i)
    }

    /// Number of segments in the set.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Layers whose erase animation is still running.
    pub fn erasing(&self) -> &[LayerId] {
        &self.erasing
    }

    /// Segments in event order.
    pub fn views(&self) -> Vec<SegmentView> {
        self.segments
            .iter()
            .map(|(i, s)| SegmentView {
                event_index: *i,
                role: s.role,
                points: s.points.clone(),
            })
            .collect()
    }

    /// Redraw from scratch with zero duration. Only the target's segment is active.
    pub fn render_static(&mut self, map: &mut dyn MapSurface, trajectory: &Trajectory, target: usize) {
        self.clear(map);
        for ev in trajectory.up_to(target) {
            let role = if ev.index == target {
                SegmentRole::Active
            } else {
                SegmentRole::Trail
            };
            self.draw(map, ev.index, ev.segment_points(), role, Millis::ZERO, Ease::Linear);
        }
        tracing::debug!(target, segments = self.segments.len(), "static paths rendered");
    }

    /// Animate forward to `target`: demote the active segment, fill skipped indices as trail,
    /// then draw the target's segment over `duration`.
    pub fn render_forward(
        &mut self,
        map: &mut dyn MapSurface,
        trajectory: &Trajectory,
        target: usize,
        duration: Millis,
        now: Millis,
    ) -> Option<AnimationTask> {
        self.demote_active(map);

        for ev in trajectory.up_to(target) {
            if ev.index == target || self.segments.contains_key(&ev.index) {
                continue;
            }
            self.draw(
                map,
                ev.index,
                ev.segment_points(),
                SegmentRole::Trail,
                Millis::ZERO,
                Ease::Linear,
            );
        }

        if let Some(old) = self.segments.remove(&target) {
            log_map_err("remove_layer", map.remove_layer(old.layer));
        }
        let points = trajectory.get(target).and_then(|e| e.segment_points());
        let drawn = self.draw(
            map,
            target,
            points,
            SegmentRole::Active,
            duration,
            Ease::InOutQuart,
        );
        drawn.then_some(AnimationTask {
            target,
            kind: AnimationKind::Draw,
            started_at: now,
            duration,
            ease: Ease::InOutQuart,
        })
    }

    /// Animate backward to `target`: start erasing every segment past it and make the target's
    /// segment active. Returns the layers that must be removed once `duration` elapses.
    pub fn render_backward(
        &mut self,
        map: &mut dyn MapSurface,
        target: usize,
        duration: Millis,
    ) -> Vec<LayerId> {
        let doomed = self.segments.split_off(&(target + 1));
        let mut erased = Vec::with_capacity(doomed.len());
        for seg in doomed.into_values() {
            if log_map_err("erase_line", map.erase_line(seg.layer, duration)).is_some() {
                self.erasing.push(seg.layer);
                erased.push(seg.layer);
            } else {
                log_map_err("remove_layer", map.remove_layer(seg.layer));
            }
        }

        self.demote_active(map);
        if let Some(seg) = self.segments.get_mut(&target) {
            log_map_err(
                "restyle_line",
                map.restyle_line(seg.layer, &LineStyle::active(), None),
            );
            seg.role = SegmentRole::Active;
        }
        tracing::debug!(target, erased = erased.len(), "paths erased");
        erased
    }

    /// Remove a layer whose erase animation has finished. Unknown layers are ignored.
    pub fn finish_erase(&mut self, map: &mut dyn MapSurface, layer: LayerId) -> bool {
        let Some(pos) = self.erasing.iter().position(|l| *l == layer) else {
            return false;
        };
        self.erasing.swap_remove(pos);
        log_map_err("remove_layer", map.remove_layer(layer));
        true
    }

    /// Remove every layer, including those still being erased.
    pub fn clear(&mut self, map: &mut dyn MapSurface) {
        for seg in std::mem::take(&mut self.segments).into_values() {
            log_map_err("remove_layer", map.remove_layer(seg.layer));
        }
        for layer in std::mem::take(&mut self.erasing) {
            log_map_err("remove_layer", map.remove_layer(layer));
        }
    }

    fn demote_active(&mut self, map: &mut dyn MapSurface) {
        for seg in self.segments.values_mut() {
            if seg.role == SegmentRole::Active {
                log_map_err(
                    "restyle_line",
                    map.restyle_line(seg.layer, &LineStyle::trail(), None),
                );
                seg.role = SegmentRole::Trail;
            }
        }
    }

    fn draw(
        &mut self,
        map: &mut dyn MapSurface,
        event_index: usize,
        points: Option<Vec<LngLat>>,
        role: SegmentRole,
        duration: Millis,
        ease: Ease,
    ) -> bool {
        let Some(points) = points else {
            return false;
        };
        let Some(layer) = log_map_err(
            "draw_line",
            map.draw_line(&points, &role.style(), duration, ease),
        ) else {
            return false;
        };
        self.segments.insert(
            event_index,
            DrawnSegment {
                layer,
                role,
                points,
            },
        );
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/paths.rs"]
mod tests;
