pub(crate) mod catalog;
pub(crate) mod gazetteer;
pub(crate) mod loader;
pub(crate) mod model;
pub(crate) mod stats;
