//! Translation error taxonomy.
//!
//! Three failure classes, all fatal for the current compilation unit and
//! none retried: rule-set drift against the upstream parser, structural
//! invariants broken by the incoming tree, and constructs deliberately left
//! unsupported. A span-locator miss is never an error; callers receive
//! `None` and treat the token as absent.

use thiserror::Error;

/// An error that aborts translation of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The rule set and the upstream parser's kind set disagree: version
    /// skew between this crate and its parser dependency, detected before
    /// any tree is walked.
    #[error(
        "translation rules out of sync with the parser's node kinds \
         (missing: [{}]; extra: [{}])",
        missing.join(", "),
        extra.join(", ")
    )]
    KindMismatch {
        /// Parser kinds with no translation rule.
        missing: Vec<&'static str>,
        /// Rules for kinds the parser no longer defines.
        extra: Vec<&'static str>,
    },

    /// A node appeared outside the only structure that may contain it, or
    /// an expected sub-token was absent from the tree and the source.
    #[error("{kind} node violates a structural invariant: {message}")]
    StructuralInvariant {
        kind: &'static str,
        message: &'static str,
    },

    /// A construct this translator deliberately does not handle: a known
    /// gap, distinct from a malformed tree.
    #[error("not implemented: {construct}")]
    Unsupported { construct: &'static str },
}

impl TranslateError {
    /// Shorthand for a structural invariant violation.
    pub(crate) fn structural(kind: &'static str, message: &'static str) -> Self {
        TranslateError::StructuralInvariant { kind, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_distinguishes_classes() {
        let mismatch = TranslateError::KindMismatch {
            missing: vec!["splat"],
            extra: vec![],
        };
        assert!(mismatch.to_string().contains("out of sync"));

        let structural = TranslateError::structural("block", "adopted only by calls");
        assert!(structural.to_string().contains("structural invariant"));

        let unsupported = TranslateError::Unsupported {
            construct: "interpolated hash-pattern key",
        };
        assert!(unsupported.to_string().starts_with("not implemented"));
    }
}
