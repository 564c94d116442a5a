//! Parsing and statistical aggregation of mapping-optimizer result logs.
//!
//! Result logs are read into finalized [`ResultContext`]s, narrowed with a
//! [`FilterSet`], and then summarized: as mean/std curves over a shared
//! evaluation axis ([`evaluation_curve`]), as architecture energy comparisons
//! ([`compare_architectures`]), or through the smaller [`views`].

pub mod aggregate;
pub mod arch;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod method;
pub mod record;
pub mod samples;
pub mod stats;
pub mod views;

#[cfg(test)]
mod testing;

pub use aggregate::{CurveMetric, EvaluationCurve, GainTransform, evaluation_curve};
pub use arch::{
    ArchAccumulator, ArchCodeMap, ArchComparison, ArchGrouping, ArchResult, ReferenceArch,
    ReferenceSelection, compare_architectures, fingerprint, pareto_front,
};
pub use config::{BlankLinePolicy, ParseConfig};
pub use context::{Label, PeData, PendingContext, ResultContext};
pub use error::AnalysisError;
pub use filter::{Comparison, Filter, FilterSet, Relation};
pub use method::Method;
pub use record::{LogUpdate, MARK, ResultReader, read_contexts};
pub use samples::{
    SampleField, SampleRecord, SampleSeries, SampleSummary, parse_samples, read_sample_file,
    sample_series, sample_summary,
};
pub use views::{
    GaMatrix, GraphGain, MatrixField, MatrixValue, PerGraphStats, ValueMatrix, ga_matrix,
    per_graph_stats, total_combined_cost, value_matrix,
};
