use std::collections::BTreeSet;

use crate::{
    aggregate::groups::LocationGroup,
    foundation::core::{LngLat, Point},
    trajectory::model::{Event, MovementType},
};

/// Size bucket derived from a group's visit count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitBucket {
    /// A single visit.
    One,
    /// Two visits.
    Two,
    /// Three visits.
    Three,
    /// Four or more visits.
    FourPlus,
}

impl VisitBucket {
    const BASE_ICON_PX: f64 = 30.0;

    /// Bucket for `visits` records. Zero counts as one.
    pub fn from_visits(visits: usize) -> Self {
        match visits {
            0 | 1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            _ => Self::FourPlus,
        }
    }

    /// CSS class, `visits-1` through `visits-4-plus`.
    pub fn class(self) -> &'static str {
        match self {
            Self::One => "visits-1",
            Self::Two => "visits-2",
            Self::Three => "visits-3",
            Self::FourPlus => "visits-4-plus",
        }
    }

    /// Square icon edge length in pixels: 30, 36, 42, 48.
    pub fn icon_px(self) -> f64 {
        let step = match self {
            Self::One => 0.0,
            Self::Two => 1.0,
            Self::Three => 2.0,
            Self::FourPlus => 3.0,
        };
        Self::BASE_ICON_PX + 6.0 * step
    }

    /// Bottom centre of the icon.
    pub fn icon_anchor(self) -> Point {
        let px = self.icon_px();
        Point::new(px / 2.0, px)
    }
}

/// Visual category of a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    /// Birthplace.
    Birth,
    /// Touched by an international move.
    International,
    /// Touched by a long move.
    LongDistance,
    /// Touched by a short move.
    ShortDistance,
    /// Several kinds of move.
    Mixed,
    /// In-place activities only.
    Activity,
    /// Nothing more specific applies.
    Default,
}

impl MarkerKind {
    /// First match wins: birth, international, long, short, mixed, activity.
    pub fn from_types(types: &BTreeSet<MovementType>) -> Self {
        if types.contains(&MovementType::Birth) {
            return Self::Birth;
        }
        if types.contains(&MovementType::InternationalMove) {
            return Self::International;
        }
        if types.contains(&MovementType::LongMove) {
            return Self::LongDistance;
        }
        if types.contains(&MovementType::ShortMove) {
            return Self::ShortDistance;
        }
        let moving = types.iter().filter(|t| !t.is_stationary()).count();
        if moving > 1 {
            return Self::Mixed;
        }
        if types.contains(&MovementType::InPlaceActivity) {
            return Self::Activity;
        }
        Self::Default
    }

    /// CSS class, e.g. `marker-birth`.
    pub fn class(self) -> &'static str {
        match self {
            Self::Birth => "marker-birth",
            Self::International => "marker-international",
            Self::LongDistance => "marker-long-distance",
            Self::ShortDistance => "marker-short-distance",
            Self::Mixed => "marker-mixed",
            Self::Activity => "marker-activity",
            Self::Default => "marker-default",
        }
    }
}

/// Everything the presentation layer needs to place one location marker.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMarker {
    /// Marker position.
    pub coordinates: LngLat,
    /// Full location name.
    pub location: String,
    /// Short label, see [`extract_city_name`].
    pub label: String,
    /// Visual category.
    pub kind: MarkerKind,
    /// Size bucket.
    pub bucket: VisitBucket,
    /// Number of visit records behind the marker.
    pub visit_count: usize,
    /// Icon edge length in pixels.
    pub icon_px: f64,
    /// Icon anchor in icon pixels.
    pub icon_anchor: Point,
    /// Marks the location of the event being shown.
    pub is_current: bool,
    /// Mood (or description) of the event at the grouping index; current marker only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
}

impl LocationMarker {
    /// Full CSS class list for the marker element.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut out = vec!["location-marker", self.kind.class(), self.bucket.class()];
        out.push(if self.is_current { "current" } else { "visited" });
        out
    }
}

/// Marker for one group. Only the current group gets a popup.
pub fn build_marker(group: &LocationGroup, current_event: Option<&Event>) -> LocationMarker {
    let visits = group.visit_count();
    let bucket = VisitBucket::from_visits(visits);
    let popup = if group.is_current {
        current_event.map(|e| e.mood.clone().unwrap_or_else(|| e.description.clone()))
    } else {
        None
    };
    LocationMarker {
        coordinates: group.coordinates,
        location: group.location.clone(),
        label: extract_city_name(&group.location),
        kind: MarkerKind::from_types(&group.movement_types),
        bucket,
        visit_count: visits,
        icon_px: bucket.icon_px(),
        icon_anchor: bucket.icon_anchor(),
        is_current: group.is_current,
        popup,
    }
}

/// Markers for every group, in group order.
pub fn build_markers(groups: &[LocationGroup], current_event: Option<&Event>) -> Vec<LocationMarker> {
    groups.iter().map(|g| build_marker(g, current_event)).collect()
}

/// Short label for a marker: the last part of the location path.
///
/// A short district or county name keeps its parent, e.g. `长沙·开福区`.
pub fn extract_city_name(location: &str) -> String {
    let parts: Vec<&str> = location.split_whitespace().collect();
    let Some((&last, rest)) = parts.split_last() else {
        return String::new();
    };
    let short_district = last.chars().count() <= 3 && (last.ends_with('区') || last.ends_with('县'));
    match rest.last() {
        Some(parent) if short_district => {
            let parent: String = parent.chars().filter(|c| !matches!(c, '省' | '市')).collect();
            format!("{parent}·{last}")
        }
        _ => last.to_string(),
    }
}
