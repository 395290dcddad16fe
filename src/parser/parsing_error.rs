//! Error types for the Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur during parsing of Newick strings.

use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during Newick parsing.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("Missing top-level comma, expected exactly two children")]
    MissingComma,
    #[error("More than two children, only bifurcating trees are supported")]
    Multifurcation,
    #[error("Invalid branch length - {0}")]
    InvalidBranchLength(String),
    #[error("Empty clade")]
    EmptyClade,
    #[error("Invalid label - {0}")]
    InvalidLabel(String),
    #[error("Missing ';' at end of tree")]
    MissingSemicolon,
    #[error("Unexpected text - {0}")]
    UnexpectedText(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and offending text).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type, byte position and offending text.
    ///
    /// The context is cut to the first 50 characters.
    pub fn new(kind: ParsingErrorType, position: usize, context: &str) -> Self {
        Self {
            kind,
            position,
            context: context.chars().take(DEFAULT_CONTEXT_LENGTH).collect(),
        }
    }

    /// Convenience constructor for UnbalancedParentheses
    pub fn unbalanced_parentheses(position: usize, context: &str) -> Self {
        Self::new(ParsingErrorType::UnbalancedParentheses, position, context)
    }

    /// Convenience constructor for MissingComma
    pub fn missing_comma(position: usize, context: &str) -> Self {
        Self::new(ParsingErrorType::MissingComma, position, context)
    }

    /// Convenience constructor for Multifurcation
    pub fn multifurcation(position: usize, context: &str) -> Self {
        Self::new(ParsingErrorType::Multifurcation, position, context)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(position: usize, context: &str, msg: String) -> Self {
        Self::new(ParsingErrorType::InvalidBranchLength(msg), position, context)
    }

    /// Convenience constructor for EmptyClade
    pub fn empty_clade(position: usize, context: &str) -> Self {
        Self::new(ParsingErrorType::EmptyClade, position, context)
    }

    /// Convenience constructor for InvalidLabel
    pub fn invalid_label(position: usize, context: &str, msg: String) -> Self {
        Self::new(ParsingErrorType::InvalidLabel(msg), position, context)
    }

    /// Convenience constructor for MissingSemicolon
    pub fn missing_semicolon(position: usize) -> Self {
        Self::new(ParsingErrorType::MissingSemicolon, position, "")
    }

    /// Convenience constructor for UnexpectedText
    pub fn unexpected_text(position: usize, context: &str, msg: String) -> Self {
        Self::new(ParsingErrorType::UnexpectedText(msg), position, context)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the byte position in the input where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the offending text (possibly cut)
    pub fn context(&self) -> &str {
        &self.context
    }
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context: {context}")
    }
}
