use std::ops::Add;

use crate::foundation::error::{GeostoryError, GeostoryResult};

pub use kurbo::{Insets, Point, Rect};

/// Longitude/latitude pair. Serialized as `[lng, lat]`, the order used by the data files.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Coordinate from longitude and latitude.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when neither component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// As a kurbo point (`x` = longitude).
    pub fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }

    /// Grouping key for exact-match aggregation.
    pub fn key(self) -> CoordKey {
        CoordKey::from(self)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(v: LngLat) -> Self {
        [v.lng, v.lat]
    }
}

impl From<Point> for LngLat {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Exact-match grouping key for a coordinate pair.
///
/// Two coordinates share a key iff their components are bit-identical after folding `-0.0`
/// into `0.0`. There is no tolerance or snapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoordKey(u64, u64);

impl From<LngLat> for CoordKey {
    fn from(c: LngLat) -> Self {
        fn bits(v: f64) -> u64 {
            if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
        }
        Self(bits(c.lng), bits(c.lat))
    }
}

/// Milliseconds on the session's virtual clock, or a duration in milliseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Clock origin and the empty duration.
    pub const ZERO: Self = Self(0);

    /// Difference, clamped at zero.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// True for a zero duration.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// Geographic bounding box. `x` spans longitude, `y` spans latitude.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoBounds(pub Rect);

impl GeoBounds {
    /// Smallest box containing every coordinate.
    ///
    /// A box with zero width and zero height (one distinct point) is grown by
    /// `single_point_offset` degrees in each direction so it can be fitted.
    pub fn around(coords: &[LngLat], single_point_offset: f64) -> GeostoryResult<Self> {
        let Some((first, rest)) = coords.split_first() else {
            return Err(GeostoryError::render("cannot compute bounds of zero points"));
        };
        if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
            return Err(GeostoryError::render(format!(
                "cannot compute bounds over non-finite coordinate {:?}",
                bad
            )));
        }

        let mut rect = Rect::from_points(first.to_point(), first.to_point());
        for c in rest {
            rect = rect.union_pt(c.to_point());
        }

        if rect.width() == 0.0 && rect.height() == 0.0 {
            rect = rect.inflate(single_point_offset, single_point_offset);
        }
        Ok(Self(rect))
    }

    /// Centre of the box.
    pub fn center(self) -> LngLat {
        self.0.center().into()
    }

    /// True if `c` lies inside or on the edge.
    pub fn contains(self, c: LngLat) -> bool {
        let r = self.0;
        r.x0 <= c.lng && c.lng <= r.x1 && r.y0 <= c.lat && c.lat <= r.y1
    }

    /// Minimum corner.
    pub fn south_west(self) -> LngLat {
        LngLat::new(self.0.x0, self.0.y0)
    }

    /// Maximum corner.
    pub fn north_east(self) -> LngLat {
        LngLat::new(self.0.x1, self.0.y1)
    }
}
