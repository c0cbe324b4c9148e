pub(crate) mod config;
pub(crate) mod prefs;
pub(crate) mod speed;
