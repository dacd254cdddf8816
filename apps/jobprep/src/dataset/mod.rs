//! Loading, bundling, profiling, and writing of tabular datasets.

pub mod bundle;
pub mod loader;
pub mod profile;
pub mod table;
pub mod writer;
