pub(crate) mod effects;
pub(crate) mod keyboard;
pub(crate) mod navigator;
pub(crate) mod session;
