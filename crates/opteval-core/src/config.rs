//! Parser configuration types.

/// How blank lines in a result log are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLinePolicy {
    /// Blank lines are ignored wherever they occur.
    #[default]
    Skip,
    /// The first blank line ends the stream; the open record is finalized.
    Terminate,
}

impl BlankLinePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            BlankLinePolicy::Skip => "skip",
            BlankLinePolicy::Terminate => "terminate",
        }
    }
}

/// Configuration options for reading result logs.
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Keep every raw line on its context for verbatim re-emission.
    pub retain_text: bool,
    /// Drop contexts that fail to finalize instead of aborting.
    pub allow_incomplete: bool,
    /// Blank line handling.
    pub blank_lines: BlankLinePolicy,
}

impl ParseConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain raw record text (filter mode).
    pub fn with_retain_text(mut self, enabled: bool) -> Self {
        self.retain_text = enabled;
        self
    }

    /// Silently drop contexts whose finalization fails.
    pub fn with_allow_incomplete(mut self, enabled: bool) -> Self {
        self.allow_incomplete = enabled;
        self
    }

    /// Set the blank line policy.
    pub fn with_blank_lines(mut self, policy: BlankLinePolicy) -> Self {
        self.blank_lines = policy;
        self
    }
}
