use xxhash_rust::xxh3::Xxh3;

use crate::{
    aggregate::marker::LocationMarker,
    foundation::core::LngLat,
    playback::effects::SceneFrame,
    render::paths::{SegmentRole, SegmentView},
};

const XXH3_SEED: u64 = 0x5e0_57a7_1e55_d00d;

/// Stable fingerprint of what a frame shows on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SceneFingerprint {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

impl std::fmt::Display for SceneFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint the visible content of `frame`: the shown index, markers, path segments
/// and highlight.
///
/// Playback state (playing, dragging, animating, speeds) is not hashed, so two frames
/// that look the same on the map compare equal regardless of how they were reached.
pub fn fingerprint_frame(frame: &SceneFrame) -> SceneFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(frame.index as u64);
    h.write_u64(frame.total_events as u64);

    h.write_u32(frame.markers.len() as u32);
    for m in &frame.markers {
        write_marker(&mut h, m);
    }

    h.write_u32(frame.segments.len() as u32);
    for s in &frame.segments {
        write_segment(&mut h, s);
    }

    match frame.highlight {
        Some(i) => {
            h.write_u8(1);
            h.write_u64(i as u64);
        }
        None => h.write_u8(0),
    }
    h.finish()
}

fn write_marker(h: &mut StableHasher, m: &LocationMarker) {
    write_lnglat(h, m.coordinates);
    h.write_str(&m.label);
    for class in m.classes() {
        h.write_str(class);
    }
    h.write_u64(m.visit_count as u64);
    h.write_f64(m.icon_px);
    match &m.popup {
        Some(p) => {
            h.write_u8(1);
            h.write_str(p);
        }
        None => h.write_u8(0),
    }
}

fn write_segment(h: &mut StableHasher, s: &SegmentView) {
    h.write_u64(s.event_index as u64);
    h.write_u8(match s.role {
        SegmentRole::Active => 0,
        SegmentRole::Trail => 1,
    });
    h.write_u32(s.points.len() as u32);
    for p in &s.points {
        write_lnglat(h, *p);
    }
}

fn write_lnglat(h: &mut StableHasher, c: LngLat) {
    h.write_f64(c.lng);
    h.write_f64(c.lat);
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> SceneFingerprint {
        let v = self.inner.digest128();
        SceneFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
