use std::path::Path;

use crate::{
    foundation::error::{GeostoryError, GeostoryResult},
    trajectory::{
        gazetteer::Gazetteer,
        model::{Event, RawEvent, RawTrajectory, Trajectory},
    },
};

/// Load the regions gazetteer. Any failure degrades to the built-in entries.
pub fn load_gazetteer(path: Option<&Path>) -> Gazetteer {
    let Some(path) = path else {
        return Gazetteer::builtin();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| GeostoryError::data(format!("read regions '{}': {e}", path.display())))
        .and_then(|s| Gazetteer::from_regions_json(&s));
    match loaded {
        Ok(g) => g,
        Err(err) => {
            tracing::warn!(%err, "gazetteer unavailable, using built-in coordinates only");
            Gazetteer::builtin()
        }
    }
}

/// Read and resolve an events file. Errors here are fatal to startup.
pub fn load_trajectory(path: &Path, gazetteer: &Gazetteer) -> GeostoryResult<Trajectory> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| GeostoryError::data(format!("read events '{}': {e}", path.display())))?;
    parse_trajectory(&json, gazetteer)
}

/// Parse an events document and resolve it against `gazetteer`.
pub fn parse_trajectory(json: &str, gazetteer: &Gazetteer) -> GeostoryResult<Trajectory> {
    let raw: RawTrajectory = serde_json::from_str(json)
        .map_err(|e| GeostoryError::serde(format!("parse events JSON: {e}")))?;
    resolve_trajectory(raw, gazetteer)
}

/// Resolve raw events into a [`Trajectory`]. Fails on an empty list.
#[tracing::instrument(skip_all, fields(events = raw.events.len()))]
pub fn resolve_trajectory(raw: RawTrajectory, gazetteer: &Gazetteer) -> GeostoryResult<Trajectory> {
    if raw.events.is_empty() {
        return Err(GeostoryError::data("events list is empty"));
    }
    let events = raw
        .events
        .into_iter()
        .enumerate()
        .map(|(i, e)| resolve_event(i, e, gazetteer))
        .collect();
    let trajectory = Trajectory::new(events)?;
    tracing::info!(events = trajectory.len(), "trajectory loaded");
    Ok(trajectory)
}

fn resolve_event(index: usize, raw: RawEvent, gazetteer: &Gazetteer) -> Event {
    let mut ev = Event::new(raw.date, raw.movement_type, raw.description);
    ev.index = index;
    ev.age = raw.age;
    ev.mood = raw.mood;

    if let Some(info) = &raw.coordinates.start {
        let r = gazetteer.resolve(info);
        if r.coordinates.is_none() {
            tracing::warn!(index, path = ?r.path, "unresolved start location");
        }
        ev.start = r.coordinates;
        ev.start_location = Some(r.name);
    }
    if let Some(info) = &raw.coordinates.end {
        let r = gazetteer.resolve(info);
        if r.coordinates.is_none() {
            tracing::warn!(index, path = ?r.path, "unresolved end location");
        }
        ev.end = r.coordinates;
        ev.end_location = Some(r.name);
    }
    for info in &raw.coordinates.transit {
        let r = gazetteer.resolve(info);
        match r.coordinates {
            Some(c) => {
                ev.transit.push(c);
                ev.transit_locations.push(r.name);
            }
            None => tracing::warn!(index, path = ?r.path, "unresolved transit location dropped"),
        }
    }

    if ev.end.is_none() {
        ev.end = ev.start;
        ev.end_location = ev.start_location.clone();
    }
    ev
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/loader.rs"]
mod tests;
