//! Constants for Newick parsing and writing.

/// Terminator of a Newick string
pub(crate) const NEWICK_TERMINATOR: char = ';';

/// Characters that cannot occur in an (unquoted) leaf label
pub(crate) const RESERVED_LABEL_CHARS: &str = "(),:;[]'";

/// Extra buffer in Newick string length/capacity estimate
pub(crate) const BUFFER_CHARS: usize = 10;
