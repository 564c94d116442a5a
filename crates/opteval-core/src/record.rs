//! Line-oriented result log reader.
//!
//! A log is a sequence of records. Each record starts with a `MARK` line
//! naming the graph, followed by `label value...` lines up to the next `MARK`
//! or the end of the stream.

use crate::config::{BlankLinePolicy, ParseConfig};
use crate::context::{PendingContext, ResultContext};
use crate::AnalysisError;
use std::io::BufRead;

/// Label that opens a new record.
pub const MARK: &str = "MARK";

/// One whitespace-tokenized log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogUpdate {
    /// First token with any trailing colon stripped.
    pub label: String,
    /// Remaining tokens.
    pub values: Vec<String>,
}

impl LogUpdate {
    /// Tokenize a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let first = fields.next()?;
        let label = first.strip_suffix(':').unwrap_or(first);
        Some(Self {
            label: label.to_string(),
            values: fields.map(str::to_string).collect(),
        })
    }

    pub fn is_mark(&self) -> bool {
        self.label == MARK
    }
}

/// Reads result logs into finalized contexts.
///
/// Several streams can be read in turn; their contexts are appended to one
/// list in input order.
#[derive(Debug, Default)]
pub struct ResultReader {
    config: ParseConfig,
    contexts: Vec<ResultContext>,
    dropped: usize,
}

impl ResultReader {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            contexts: Vec::new(),
            dropped: 0,
        }
    }

    /// Read every record of one stream.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, on a field line before the first `MARK`, on any
    /// field validation error, and on finalization errors unless incomplete
    /// results are allowed.
    pub fn read<R: BufRead>(&mut self, reader: R) -> Result<usize, AnalysisError> {
        let before = self.contexts.len();
        let mut pending: Option<PendingContext> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let Some(update) = LogUpdate::parse(&line) else {
                match self.config.blank_lines {
                    BlankLinePolicy::Skip => continue,
                    BlankLinePolicy::Terminate => break,
                }
            };

            if update.is_mark() {
                if let Some(done) = pending.take() {
                    self.finish(done)?;
                }
                pending = Some(PendingContext::new());
            }

            let Some(ctx) = pending.as_mut() else {
                return Err(AnalysisError::MissingMark { line: idx + 1 });
            };
            ctx.update(&update.label, &update.values)?;
            if self.config.retain_text {
                ctx.push_text(&line);
            }
        }

        if let Some(done) = pending {
            self.finish(done)?;
        }

        let added = self.contexts.len() - before;
        tracing::debug!(
            component = "record",
            operation = "read",
            status = "success",
            contexts = added,
            blank_lines = self.config.blank_lines.as_str(),
            "Read {} contexts",
            added
        );
        Ok(added)
    }

    fn finish(&mut self, pending: PendingContext) -> Result<(), AnalysisError> {
        let graph = pending.graph().unwrap_or("?").to_string();
        match pending.finalize() {
            Ok(ctx) => {
                self.contexts.push(ctx);
                Ok(())
            }
            Err(err) if self.config.allow_incomplete => {
                tracing::warn!(
                    component = "record",
                    operation = "finalize",
                    status = "warning",
                    graph = %graph,
                    "Dropping incomplete context: {err}"
                );
                self.dropped += 1;
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    component = "record",
                    operation = "finalize",
                    status = "error",
                    graph = %graph,
                    "{err}"
                );
                Err(err)
            }
        }
    }

    /// Contexts read so far.
    pub fn contexts(&self) -> &[ResultContext] {
        &self.contexts
    }

    /// Number of contexts dropped as incomplete.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_contexts(self) -> Vec<ResultContext> {
        self.contexts
    }
}

/// Read one stream with the given configuration.
pub fn read_contexts<R: BufRead>(
    reader: R,
    config: &ParseConfig,
) -> Result<Vec<ResultContext>, AnalysisError> {
    let mut results = ResultReader::new(config.clone());
    results.read(reader)?;
    Ok(results.into_contexts())
}
