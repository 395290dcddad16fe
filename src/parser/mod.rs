//! Low-level parsing infrastructure.
//!
//! This module provides the bracket-aware [TextSpan] on which the Newick
//! parser operates, and the [ParsingError] reported for malformed input.

pub mod parsing_error;
pub mod text_span;

pub use parsing_error::{ParsingError, ParsingErrorType};
pub use text_span::TextSpan;
