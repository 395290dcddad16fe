//! Newick format parser and writer for bifurcating phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick strings into
//! [`Tree`]s and [`to_newick`] as its inverse.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string, returns a [`Tree`]
//! * [`to_newick`] - writes a [`Tree`] as Newick string
//!
//! # Format
//! The supported Newick grammar is restricted to strictly bifurcating trees:
//! * `tree ::= internal_vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex ',' vertex ')' [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Whitespace can occur between elements, just not within a label or a
//! branch length. Comments, quoted labels and multifurcations are rejected.

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::to_newick;

use crate::model::Tree;
use crate::parser::ParsingError;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`Tree`].
///
/// # Arguments
/// * `newick` - The Newick string to parse, terminated by `;`
///
/// # Returns
/// * [`Tree`] - Tree parsed from the string
/// * [`ParsingError`] - If the string is not valid bifurcating Newick
///
/// # Example
/// ```
/// use nnitree::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// assert!(parse_str("(A:1,B:1;").is_err());
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    NewickParser::new().parse_str(newick.as_ref())
}
