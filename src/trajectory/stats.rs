use std::collections::BTreeSet;

use crate::trajectory::model::{MovementType, Trajectory};

/// Headline numbers shown next to the timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryStats {
    /// Number of events.
    pub total_events: usize,
    /// Events that move somewhere (everything except birth and in-place activity).
    pub movement_count: usize,
    /// Distinct destinations, coarsened to province (or city when no province is named).
    pub visited_places: usize,
    /// International moves.
    pub international_count: usize,
    /// Years between the first and last event, when both dates start with a year.
    pub time_span_years: Option<i32>,
}

impl TrajectoryStats {
    /// Statistics over the whole trajectory.
    pub fn compute(trajectory: &Trajectory) -> Self {
        let events = trajectory.events();
        let movement_count = events
            .iter()
            .filter(|e| !e.movement_type.is_stationary())
            .count();
        let international_count = events
            .iter()
            .filter(|e| e.movement_type == MovementType::InternationalMove)
            .count();
        let visited: BTreeSet<&str> = events
            .iter()
            .filter_map(|e| e.end_location.as_deref())
            .map(coarse_place)
            .collect();

        let first_year = events.first().and_then(|e| leading_year(&e.date));
        let last_year = events.last().and_then(|e| leading_year(&e.date));
        let time_span_years = first_year.zip(last_year).map(|(a, b)| b - a);

        Self {
            total_events: events.len(),
            movement_count,
            visited_places: visited.len(),
            international_count,
            time_span_years,
        }
    }
}

fn coarse_place(location: &str) -> &str {
    for marker in ["省", "市"] {
        if let Some(pos) = location.find(marker) {
            return &location[..pos + marker.len()];
        }
    }
    location
}

fn leading_year(date: &str) -> Option<i32> {
    date.split('-').next()?.trim().parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/stats.rs"]
mod tests;
