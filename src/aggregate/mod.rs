//! Location aggregation: everywhere visited by events `0..=index`, grouped by exact
//! coordinate, and the marker styling derived from each group.

pub(crate) mod groups;
pub(crate) mod marker;
