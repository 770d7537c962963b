//! Parse error kinds.
//!
//! Every failure aborts the parse and surfaces to the caller; there is no
//! silent recovery. Errors carry the offending tape index (or input byte
//! offset, for the tokenizer) where knowable. The arena built so far is
//! dropped when an error propagates.

use std::fmt;

/// Everything that can go wrong between input text and a finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The scanner rejected the input text.
    TokenizerFailure {
        /// Byte offset into the input where scanning stopped.
        offset: usize,
        message: String,
    },
    /// The tape did not begin with a well-formed root slot.
    MissingRoot,
    /// A partial builder finished outside the accepting state.
    SyntaxStateMismatch { tape_index: usize },
    /// More closes than opens across the document.
    OverClose { tape_index: usize },
    /// Containers were still open after the last merge.
    UnderClose,
    /// A key in an array position, a value without a preceding key in an
    /// object, or a kind-contradicting tree mutation.
    StructuralInvalidBoundary { message: String },
}

impl ParseError {
    pub(crate) fn structural<S: Into<String>>(message: S) -> Self {
        ParseError::StructuralInvalidBoundary {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TokenizerFailure { offset, message } => {
                write!(f, "tokenizer failure at byte {offset}: {message}")
            }
            ParseError::MissingRoot => write!(f, "tape does not begin with a root slot"),
            ParseError::SyntaxStateMismatch { tape_index } => {
                write!(f, "builder left in a non-accepting state at tape slot {tape_index}")
            }
            ParseError::OverClose { tape_index } => {
                write!(
                    f,
                    "more closes than opens (partition starting at tape slot {tape_index})"
                )
            }
            ParseError::UnderClose => write!(f, "containers left open at end of input"),
            ParseError::StructuralInvalidBoundary { message } => {
                write!(f, "structural violation: {message}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
