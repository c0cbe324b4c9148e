//! Map-side rendering: the map capability, path segments, camera moves and highlights.

pub(crate) mod camera;
pub(crate) mod highlight;
pub(crate) mod map;
pub(crate) mod paths;
pub(crate) mod recording;
