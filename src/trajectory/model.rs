use crate::foundation::{
    core::LngLat,
    error::{GeostoryError, GeostoryResult},
};

/// Geographic character of an event.
///
/// Accepts the kebab-case names as well as the Chinese labels found in event data files.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MovementType {
    /// Birth at a single place.
    #[serde(alias = "出生")]
    Birth,
    /// Activity where the subject already is.
    #[serde(alias = "原地活动")]
    InPlaceActivity,
    /// Short-distance move.
    #[serde(alias = "短途移动")]
    ShortMove,
    /// Long-distance move.
    #[serde(alias = "长途移动")]
    LongMove,
    /// Move across a national border.
    #[serde(alias = "国际移动")]
    InternationalMove,
}

impl MovementType {
    /// Birth and in-place activity happen at a single location.
    pub fn is_stationary(self) -> bool {
        matches!(self, Self::Birth | Self::InPlaceActivity)
    }

    /// Kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::InPlaceActivity => "in-place-activity",
            Self::ShortMove => "short-move",
            Self::LongMove => "long-move",
            Self::InternationalMove => "international-move",
        }
    }
}

/// Location as written in the data file: either inline coordinates or an administrative
/// address resolved against the gazetteer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LocationInfo {
    /// Country; absent means domestic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Province or municipality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// District or county.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Inline `[lng, lat]`, preferred over the address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<LngLat>,
}

/// Locations of an event as written in the data file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawCoordinates {
    /// Where the event starts.
    pub start: Option<LocationInfo>,
    /// Where the event ends.
    pub end: Option<LocationInfo>,
    /// Waypoints, in order.
    pub transit: Vec<LocationInfo>,
}

/// One event as written in the data file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Free-form date, usually `YYYY-MM-DD`.
    pub date: String,
    /// Subject's age at the event.
    #[serde(default)]
    pub age: Option<u32>,
    /// Geographic character.
    pub movement_type: MovementType,
    /// What happened.
    #[serde(rename = "event", alias = "description")]
    pub description: String,
    /// Short mood line shown in the marker popup.
    #[serde(default)]
    pub mood: Option<String>,
    /// Event locations.
    #[serde(default)]
    pub coordinates: RawCoordinates,
}

/// Top-level shape of an events data file: `{ "events": [...] }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawTrajectory {
    /// Events in chronological order.
    pub events: Vec<RawEvent>,
}

/// One biographical record with coordinates resolved.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Position in the trajectory.
    pub index: usize,
    /// Free-form date, usually `YYYY-MM-DD`.
    pub date: String,
    /// Subject's age at the event.
    pub age: Option<u32>,
    /// Geographic character.
    pub movement_type: MovementType,
    /// Resolved start.
    pub start: Option<LngLat>,
    /// Resolved end. Falls back to `start`.
    pub end: Option<LngLat>,
    /// Resolved waypoints, in order.
    pub transit: Vec<LngLat>,
    /// Display name of the start.
    pub start_location: Option<String>,
    /// Display name of the end.
    pub end_location: Option<String>,
    /// Display names parallel to `transit`.
    pub transit_locations: Vec<String>,
    /// What happened.
    pub description: String,
    /// Short mood line shown in the marker popup.
    pub mood: Option<String>,
}

impl Event {
    /// Event with no locations, indexed when placed in a [`Trajectory`].
    pub fn new(
        date: impl Into<String>,
        movement_type: MovementType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            index: 0,
            date: date.into(),
            age: None,
            movement_type,
            start: None,
            end: None,
            transit: Vec::new(),
            start_location: None,
            end_location: None,
            transit_locations: Vec::new(),
            description: description.into(),
            mood: None,
        }
    }

    /// Builder: set the start.
    pub fn starting_at(mut self, c: LngLat) -> Self {
        self.start = Some(c);
        self
    }

    /// Builder: set the end.
    pub fn ending_at(mut self, c: LngLat) -> Self {
        self.end = Some(c);
        self
    }

    /// Builder: append a waypoint.
    pub fn via(mut self, c: LngLat) -> Self {
        self.transit.push(c);
        self
    }

    /// Whether this event contributes a path segment: both endpoints resolved and the
    /// movement is not stationary. Births never draw a segment.
    pub fn has_segment(&self) -> bool {
        self.start.is_some() && self.end.is_some() && !self.movement_type.is_stationary()
    }

    /// Start, transit points in order, then end.
    pub fn segment_points(&self) -> Option<Vec<LngLat>> {
        if !self.has_segment() {
            return None;
        }
        let (start, end) = (self.start?, self.end?);
        let mut pts = Vec::with_capacity(self.transit.len() + 2);
        pts.push(start);
        pts.extend(self.transit.iter().copied());
        pts.push(end);
        Some(pts)
    }
}

/// Ordered, non-empty, immutable event sequence. Index is the only addressing scheme.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Trajectory {
    events: Vec<Event>,
}

impl Trajectory {
    /// Index the events and fill missing ends from starts. Fails when empty.
    pub fn new(mut events: Vec<Event>) -> GeostoryResult<Self> {
        if events.is_empty() {
            return Err(GeostoryError::data("trajectory contains no events"));
        }
        for (i, e) in events.iter_mut().enumerate() {
            e.index = i;
            if e.end.is_none() {
                e.end = e.start;
                e.end_location = e.start_location.clone();
            }
        }
        Ok(Self { events })
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false for a constructed trajectory.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Index of the last event.
    pub fn last_index(&self) -> usize {
        self.events.len().saturating_sub(1)
    }

    /// Event at `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// All events in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events `0..=index`, clamped to the sequence.
    pub fn up_to(&self, index: usize) -> &[Event] {
        let end = index.min(self.last_index()) + 1;
        &self.events[..end]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/model.rs"]
mod tests;
