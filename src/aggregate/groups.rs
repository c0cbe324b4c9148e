use std::collections::{BTreeSet, HashMap};

use crate::{
    foundation::core::{CoordKey, LngLat},
    trajectory::{
        gazetteer::UNKNOWN_LOCATION,
        model::{Event, MovementType, Trajectory},
    },
};

/// Why an event touches a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitRole {
    /// Birthplace.
    Origin,
    /// In-place activity.
    Activity,
    /// Start of a move.
    Departure,
    /// End of a move.
    Arrival,
    /// Waypoint of a move.
    Transit,
}

/// One event's role at a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Index of the event in its trajectory.
    pub event_index: usize,
    /// How the event touches the location.
    pub role: VisitRole,
}

/// Per-role record counts for one location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct VisitSummary {
    /// Births.
    pub origin: usize,
    /// Move ends.
    pub arrival: usize,
    /// Move starts.
    pub departure: usize,
    /// Waypoints.
    pub transit: usize,
    /// In-place activities.
    pub activity: usize,
}

/// Every event role resolving to one coordinate, as of some index.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroup {
    /// Shared coordinate of every record.
    pub coordinates: LngLat,
    /// Display name taken from the first record at this coordinate.
    pub location: String,
    /// One record per role an event plays here, in event order.
    pub records: Vec<VisitRecord>,
    /// Movement types of the events that touched this coordinate.
    pub movement_types: BTreeSet<MovementType>,
    /// Coordinate equals the end location of the event at the grouping index.
    pub is_current: bool,
}

impl LocationGroup {
    /// Exact-match key of [`LocationGroup::coordinates`].
    pub fn key(&self) -> CoordKey {
        self.coordinates.key()
    }

    /// Number of records, one per event role.
    pub fn visit_count(&self) -> usize {
        self.records.len()
    }

    /// Record counts by role.
    pub fn summary(&self) -> VisitSummary {
        let mut s = VisitSummary::default();
        for r in &self.records {
            match r.role {
                VisitRole::Origin => s.origin += 1,
                VisitRole::Arrival => s.arrival += 1,
                VisitRole::Departure => s.departure += 1,
                VisitRole::Transit => s.transit += 1,
                VisitRole::Activity => s.activity += 1,
            }
        }
        s
    }
}

/// Group events `0..=index` by coordinate.
///
/// Rebuilt from scratch on every call. Groups come back in order of first appearance.
#[tracing::instrument(skip(trajectory), fields(events = trajectory.len()))]
pub fn group_events_by_location(trajectory: &Trajectory, index: usize) -> Vec<LocationGroup> {
    let current = trajectory.get(index).and_then(|e| e.end).map(LngLat::key);

    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut slots: HashMap<CoordKey, usize> = HashMap::new();

    let mut add = |coordinates: LngLat, location: Option<&str>, ev: &Event, role: VisitRole| {
        let key = coordinates.key();
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(LocationGroup {
                coordinates,
                location: location.unwrap_or(UNKNOWN_LOCATION).to_string(),
                records: Vec::new(),
                movement_types: BTreeSet::new(),
                is_current: current == Some(key),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.records.push(VisitRecord {
            event_index: ev.index,
            role,
        });
        group.movement_types.insert(ev.movement_type);
    };

    for ev in trajectory.up_to(index) {
        match ev.movement_type {
            MovementType::Birth | MovementType::InPlaceActivity => {
                let role = if ev.movement_type == MovementType::Birth {
                    VisitRole::Origin
                } else {
                    VisitRole::Activity
                };
                if let Some(c) = ev.end {
                    add(c, ev.end_location.as_deref(), ev, role);
                }
            }
            _ => {
                if let Some(c) = ev.start {
                    add(c, ev.start_location.as_deref(), ev, VisitRole::Departure);
                }
                if let Some(c) = ev.end {
                    add(c, ev.end_location.as_deref(), ev, VisitRole::Arrival);
                }
                for (i, c) in ev.transit.iter().enumerate() {
                    let name = ev.transit_locations.get(i).map(String::as_str);
                    add(*c, name, ev, VisitRole::Transit);
                }
            }
        }
    }

    tracing::debug!(groups = groups.len(), "locations grouped");
    groups
}

#[cfg(test)]
#[path = "../../tests/unit/aggregate/groups.rs"]
mod tests;
