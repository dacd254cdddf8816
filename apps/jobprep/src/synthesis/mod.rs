// Interaction log synthesis from the labeled recommendation table.
// Realistic mode is randomized (caller-seeded); simple mode is deterministic.

pub mod realistic;
pub mod simple;
pub mod stats;
