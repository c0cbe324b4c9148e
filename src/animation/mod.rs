pub(crate) mod ease;
pub(crate) mod scheduler;
pub(crate) mod task;
