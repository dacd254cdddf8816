// Dataset integration: skill-similarity record linkage, salary aggregation,
// the join pipeline, and its summary report.

pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod salary;
pub mod skills;
