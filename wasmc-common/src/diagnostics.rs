//! Compiler diagnostics: the accumulating, non-`Result`-based error channel
//! used by the semantic-IR builders and the WebAssembly generator (§7 of the
//! spec). Fatal diagnostics terminate the current top-level `compile()`
//! call; warnings (recoverable shape/dynamic fallbacks, `Unimplement`
//! markers) accumulate and never stop compilation.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, start: u32, length: u32, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            start,
            length,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn warning(file: impl Into<String>, start: u32, length: u32, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Warning,
            code,
            file: file.into(),
            start,
            length,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn with_related(mut self, file: impl Into<String>, start: u32, length: u32, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            start,
            length,
            message: message.into(),
        });
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        write!(f, "{}:{}: {} TS{}: {}", self.file, self.start, kind, self.code, self.message)
    }
}

/// Diagnostic codes used across the build context and the WebAssembly
/// generator. Grouped by the error kinds §7 of the spec names.
pub mod codes {
    pub const TYPE_MISMATCH: u32 = 1001;
    pub const UNRESOLVED_IDENTIFIER: u32 = 1002;
    pub const UNRESOLVED_MEMBER: u32 = 1003;
    pub const GENERIC_INSTANTIATION_FAILED: u32 = 1004;
    pub const UNIMPLEMENTED: u32 = 1005;
    pub const SHAPE_FALLBACK: u32 = 1006;
}

#[cfg(test)]
#[path = "tests/diagnostics.rs"]
mod tests;
