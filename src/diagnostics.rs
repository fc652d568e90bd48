use std::fmt;

/// A single failed entry or query-time fallback, captured rather than
/// propagated. `error` is the `Display` rendering of the originating
/// `MappingError` rather than the error itself, so `DiagnosticRecord` can
/// stay plain data, cheap to clone and to hand back to a caller inspecting
/// a partially-built mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// `Some(entry_index)` for a build-time failure; `None` for a
    /// query-time fallback failure.
    pub entry_index: Option<usize>,
    pub context: String,
    pub error: String,
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry_index {
            Some(i) => write!(f, "entry {}: {}: {}", i, self.context, self.error),
            None => write!(f, "{}: {}", self.context, self.error),
        }
    }
}

/// Captures per-entry build failures so a single bad line in a mapping file
/// does not abort the whole build. Query-time fallback failures (the OSIS
/// translation best-effort path) are recorded separately and never affect
/// `has_errors`, which is strictly "did any entry fail to compile".
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    build_failures: Vec<DiagnosticRecord>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_build_failure(&mut self, entry_index: usize, context: impl Into<String>, error: impl fmt::Display) {
        self.build_failures.push(DiagnosticRecord {
            entry_index: Some(entry_index),
            context: context.into(),
            error: error.to_string(),
        });
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.build_failures.is_empty()
    }

    #[must_use]
    pub fn build_failures(&self) -> &[DiagnosticRecord] {
        &self.build_failures
    }
}
