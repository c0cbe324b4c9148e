use std::collections::HashMap;

use crate::{
    foundation::{
        core::LngLat,
        error::{GeostoryError, GeostoryResult},
    },
    trajectory::model::LocationInfo,
};

/// Country name treated as domestic: addresses use province/city/district rather than
/// country/city.
pub const DOMESTIC_COUNTRY: &str = "中国";

/// Display name for a location that carries no address parts.
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Entries always present, whether or not a regions file loaded.
pub const BUILTIN_COORDINATES: &[(&str, LngLat)] =
    &[("俄罗斯 莫斯科", LngLat::new(37.6176, 55.7558))];

/// Shape of the regions gazetteer file: `{ "regions": [{ "ext_path", "coordinates" }] }`.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct RegionsFile {
    /// Every region entry. Malformed entries are skipped when building.
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
}

/// One region: an administrative path and its `[lng, lat]`.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct RegionEntry {
    /// Space-separated administrative path, e.g. `湖南省 长沙市`.
    #[serde(default)]
    pub ext_path: Option<String>,
    /// `[lng, lat]`.
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

/// A location resolved for display and placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLocation {
    /// Placement, if the location resolved.
    pub coordinates: Option<LngLat>,
    /// Display name.
    pub name: String,
    /// Administrative path used for the lookup, when one could be built.
    pub path: Option<String>,
}

/// Administrative-path → coordinate table.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    by_path: HashMap<String, LngLat>,
}

impl Gazetteer {
    /// Only the built-in entries.
    pub fn builtin() -> Self {
        let mut g = Self::default();
        g.insert_builtins();
        g
    }

    /// Table from a regions file plus the built-ins.
    pub fn from_regions(file: RegionsFile) -> Self {
        let mut g = Self::default();
        let mut skipped = 0usize;
        for region in file.regions {
            match (region.ext_path, region.coordinates.as_deref()) {
                (Some(path), Some(&[lng, lat])) if !path.is_empty() => {
                    g.by_path.insert(path, LngLat::new(lng, lat));
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "ignored malformed gazetteer regions");
        }
        g.insert_builtins();
        tracing::info!(entries = g.len(), "gazetteer built");
        g
    }

    /// Parse a regions file and build the table.
    pub fn from_regions_json(json: &str) -> GeostoryResult<Self> {
        let file: RegionsFile = serde_json::from_str(json)
            .map_err(|e| GeostoryError::serde(format!("parse regions JSON: {e}")))?;
        Ok(Self::from_regions(file))
    }

    fn insert_builtins(&mut self) {
        for (path, c) in BUILTIN_COORDINATES {
            self.by_path.insert((*path).to_string(), *c);
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, c: LngLat) {
        self.by_path.insert(path.into(), c);
    }

    /// Coordinate for an exact administrative path.
    pub fn get(&self, path: &str) -> Option<LngLat> {
        self.by_path.get(path).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Inline coordinates win; otherwise the administrative path is looked up.
    pub fn resolve(&self, info: &LocationInfo) -> ResolvedLocation {
        let path = full_location_path(info);
        let coordinates = info
            .coordinates
            .or_else(|| path.as_deref().and_then(|p| self.get(p)));
        ResolvedLocation {
            coordinates,
            name: format_location_name(info),
            path,
        }
    }
}

fn is_foreign(info: &LocationInfo) -> bool {
    info.country
        .as_deref()
        .is_some_and(|c| !c.is_empty() && c != DOMESTIC_COUNTRY)
}

/// Lookup key for the gazetteer: `country city` abroad, `province city district` at home
/// (district dropped when it repeats the city).
pub fn full_location_path(info: &LocationInfo) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if is_foreign(info) {
        parts.extend(info.country.as_deref());
        parts.extend(info.city.as_deref());
    } else {
        parts.extend(info.province.as_deref());
        parts.extend(info.city.as_deref());
        if info.district.is_some() && info.district != info.city {
            parts.extend(info.district.as_deref());
        }
    }
    parts.retain(|p| !p.is_empty());
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Human-readable name. Unlike [`full_location_path`], a city equal to its province
/// (municipalities) is written once.
pub fn format_location_name(info: &LocationInfo) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if is_foreign(info) {
        parts.extend(info.country.as_deref());
        parts.extend(info.city.as_deref());
    } else {
        parts.extend(info.province.as_deref());
        if info.city.is_some() && info.city != info.province {
            parts.extend(info.city.as_deref());
        }
        if info.district.is_some() && info.district != info.city {
            parts.extend(info.district.as_deref());
        }
    }
    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/gazetteer.rs"]
mod tests;
