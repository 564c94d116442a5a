//! Analysis error types.

/// Errors raised while parsing result logs or aggregating contexts.
///
/// Every variant is fatal for the run that produced it. The only recovery the
/// crate performs is dropping a context whose finalization fails when
/// [`ParseConfig::allow_incomplete`](crate::ParseConfig) is set.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A field line appeared before any `MARK` line.
    MissingMark { line: usize },
    /// A numeric field violated its documented range.
    OutOfRange { label: String, value: String },
    /// A record did not carry enough values for its label.
    Arity {
        label: String,
        expected: usize,
        found: usize,
    },
    /// A value could not be parsed as a number.
    NotANumber { label: String, value: String },
    /// `optimization_method` named a method outside the known set.
    UnknownMethod(String),
    /// Interconnect records of one run disagree on frequency.
    NonSymmetricBuses { expected: u64, found: u64 },
    /// A computation needed at least one value and got none.
    EmptyDataset(&'static str),
    /// A field required by finalization or an aggregate view was never set.
    MissingField(&'static str),
    /// A filter argument could not be turned into a predicate.
    InvalidFilter { key: String, reason: String },
    /// A PE descriptor has no letter code in the current comparison.
    UnknownArchitecture(String),
    /// Contexts could not be partitioned into architectures.
    InvalidGrouping(String),
    /// A binary sample file ended in the middle of a record.
    TruncatedSamples { len: usize, record_size: usize },
    /// Underlying I/O failure.
    Io(String),
}

impl AnalysisError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::MissingMark { .. } => "LOG_MISSING_MARK",
            AnalysisError::OutOfRange { .. } => "FIELD_OUT_OF_RANGE",
            AnalysisError::Arity { .. } => "FIELD_ARITY",
            AnalysisError::NotANumber { .. } => "FIELD_NOT_A_NUMBER",
            AnalysisError::UnknownMethod(_) => "METHOD_UNKNOWN",
            AnalysisError::NonSymmetricBuses { .. } => "IC_NON_SYMMETRIC",
            AnalysisError::EmptyDataset(_) => "DATASET_EMPTY",
            AnalysisError::MissingField(_) => "FIELD_MISSING",
            AnalysisError::InvalidFilter { .. } => "FILTER_INVALID",
            AnalysisError::UnknownArchitecture(_) => "ARCH_UNKNOWN_PE",
            AnalysisError::InvalidGrouping(_) => "ARCH_GROUPING",
            AnalysisError::TruncatedSamples { .. } => "SAMPLES_TRUNCATED",
            AnalysisError::Io(_) => "IO",
        }
    }

    pub(crate) fn out_of_range(label: &str, value: impl ToString) -> Self {
        AnalysisError::OutOfRange {
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_filter(key: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidFilter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MissingMark { line } => write!(
                f,
                "[{}] Line {} is outside any record (missing MARK?)",
                self.code(),
                line
            ),
            AnalysisError::OutOfRange { label, value } => write!(
                f,
                "[{}] Value {} is out of range for {}",
                self.code(),
                value,
                label
            ),
            AnalysisError::Arity {
                label,
                expected,
                found,
            } => write!(
                f,
                "[{}] {} needs {} values, found {}",
                self.code(),
                label,
                expected,
                found
            ),
            AnalysisError::NotANumber { label, value } => write!(
                f,
                "[{}] {} is not a number in {}",
                self.code(),
                value,
                label
            ),
            AnalysisError::UnknownMethod(method) => {
                write!(f, "[{}] Unknown method: {}", self.code(), method)
            }
            AnalysisError::NonSymmetricBuses { expected, found } => write!(
                f,
                "[{}] Non-symmetric buses: frequency {} differs from {}",
                self.code(),
                found,
                expected
            ),
            AnalysisError::EmptyDataset(what) => {
                write!(f, "[{}] Empty dataset: {}", self.code(), what)
            }
            AnalysisError::MissingField(field) => {
                write!(f, "[{}] Field {} was never set", self.code(), field)
            }
            AnalysisError::InvalidFilter { key, reason } => {
                write!(f, "[{}] Invalid filter {}: {}", self.code(), key, reason)
            }
            AnalysisError::UnknownArchitecture(pe) => write!(
                f,
                "[{}] PE {} has no architecture code",
                self.code(),
                pe
            ),
            AnalysisError::InvalidGrouping(reason) => {
                write!(f, "[{}] Cannot group architectures: {}", self.code(), reason)
            }
            AnalysisError::TruncatedSamples { len, record_size } => write!(
                f,
                "[{}] Sample data of {} bytes is not divisible by record size {}",
                self.code(),
                len,
                record_size
            ),
            AnalysisError::Io(msg) => write!(f, "[{}] I/O error: {}", self.code(), msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}
