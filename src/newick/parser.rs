//! Parser for bifurcating Newick strings.

use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use crate::newick::defs::{NEWICK_TERMINATOR, RESERVED_LABEL_CHARS};
use crate::parser::{ParsingError, TextSpan};
use tracing::trace;

/// Parser for Newick strings describing rooted bifurcating [Tree]s.
///
/// The parser descends over clades: for a clade's text it splits off the
/// optional `:length` suffix, then either recognizes a leaf label or strips
/// the enclosing parentheses and splits the content at its unique top-level
/// comma, descending into both halves. Pending clades sit on an explicit
/// stack, so deep caterpillar trees do not exhaust the call stack. Vertices
/// are added to the tree bottom-up, children before their parent, the root
/// last.
///
/// The descent works on [TextSpan]s, not on vertex names: internal vertices
/// and the root carry no label.
///
/// # Format
/// * `tree ::= root ';'`
/// * `root ::= '(' vertex ',' vertex ')' [branch_length]`
/// * `vertex ::= leaf | internal_vertex`
/// * `internal_vertex ::= '(' vertex ',' vertex ')' [branch_length]`
/// * `leaf ::= label [branch_length]`
/// * `branch_length ::= ':' number`
///
/// Furthermore:
/// * Whitespace can occur between elements, just not within a label
/// * A branch length of the root is accepted and ignored
/// * Comments, quoted labels and multifurcations are not supported
///
/// # Example
/// ```
/// use nnitree::newick::NewickParser;
///
/// let tree = NewickParser::new().parse_str("((A:1,B:1):2,C:3);").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Default, Clone)]
pub struct NewickParser {}

impl NewickParser {
    /// Creates a new `NewickParser`.
    pub fn new() -> Self {
        Self {}
    }

    /// Parses a single Newick string, terminated by `;`, into a [Tree].
    ///
    /// # Arguments
    /// * `newick` - The Newick string; surrounding whitespace is ignored
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick string is malformed;
    ///   parsing aborts on the first error, no partial tree is returned
    pub fn parse_str(&self, newick: &str) -> Result<Tree, ParsingError> {
        let body = strip_terminator(TextSpan::new(newick).trim())?.trim();
        if body.is_empty() {
            return Err(ParsingError::empty_clade(body.start(), newick));
        }

        if let Some(position) = body.first_unbalanced() {
            return Err(ParsingError::unbalanced_parentheses(
                position,
                &newick[position..],
            ));
        }

        // Strictly bifurcating: one more leaf than commas
        let num_leaves = body.as_str().matches(',').count() + 1;
        CladeBuilder::new(num_leaves).build(body)
    }
}

/// Removes the terminating `;`, which must be the last non-whitespace character.
fn strip_terminator(span: TextSpan<'_>) -> Result<TextSpan<'_>, ParsingError> {
    match span.as_str().find(NEWICK_TERMINATOR) {
        None => Err(ParsingError::missing_semicolon(span.end())),
        Some(offset) if offset + 1 != span.len() => {
            let rest = span.sub(offset + 1, span.len());
            Err(ParsingError::unexpected_text(
                rest.start(),
                rest.as_str(),
                "text after ';'".to_string(),
            ))
        }
        Some(offset) => Ok(span.sub(0, offset)),
    }
}

/// Pending work of the descent, kept on an explicit stack.
enum Task<'a> {
    /// Clade text still to be split
    Clade(TextSpan<'a>),
    /// Both children are built, join them under a new internal vertex
    Join(Option<BranchLength>),
    /// Both children of the root are built
    JoinRoot,
}

/// Holds the tree under construction while descending over clades.
///
/// Clades are split top-down but vertices are added bottom-up: a split
/// schedules a join below its two children, and a join takes the indices of
/// the finished children from `built`.
struct CladeBuilder<'a> {
    tree: Tree,
    tasks: Vec<Task<'a>>,
    built: Vec<VertexIndex>,
}

impl<'a> CladeBuilder<'a> {
    fn new(num_leaves: usize) -> Self {
        Self {
            tree: Tree::new(num_leaves),
            tasks: Vec::new(),
            built: Vec::new(),
        }
    }

    /// Parses the root clade `(left, right)[:branch_length]` and everything
    /// below it. A root branch length is parsed, to report malformed values,
    /// but not stored.
    fn build(mut self, span: TextSpan<'a>) -> Result<Tree, ParsingError> {
        let (content, length_span) = span.split_branch_length();
        if let Some(length_span) = length_span {
            let root_length = parse_branch_length(length_span)?;
            trace!(?root_length, "ignoring branch length of root");
        }

        let content = content.trim();
        if !content.starts_with(b'(') {
            // A single leaf cannot be the root of a bifurcating tree
            return Err(ParsingError::missing_comma(
                content.start(),
                content.as_str(),
            ));
        }
        self.split(content, Task::JoinRoot)?;

        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Clade(span) => self.parse_vertex(span)?,
                Task::Join(branch_length) => {
                    let children = self.take_children();
                    let index = self.tree.add_internal_vertex(children, branch_length);
                    self.built.push(index);
                }
                Task::JoinRoot => {
                    let children = self.take_children();
                    self.tree.add_root(children);
                }
            }
        }

        Ok(self.tree)
    }

    /// Handles one vertex (either internal vertex or leaf):
    /// - Splits off optional `:branch_length`
    /// - Schedules its children if it starts with `(`, otherwise adds a leaf
    fn parse_vertex(&mut self, span: TextSpan<'a>) -> Result<(), ParsingError> {
        let span = span.trim();
        if span.is_empty() {
            return Err(ParsingError::empty_clade(span.start(), span.as_str()));
        }

        let (content, length_span) = span.split_branch_length();
        let branch_length = match length_span {
            Some(length_span) => Some(parse_branch_length(length_span)?),
            None => None,
        };

        let content = content.trim();
        if content.starts_with(b'(') {
            self.split(content, Task::Join(branch_length))
        } else {
            let index = self.parse_leaf(content, branch_length)?;
            self.built.push(index);
            Ok(())
        }
    }

    /// Splits children pair `(left, right)` and schedules `join` after both:
    /// - Expects span to be exactly one parenthesized group
    /// - Splits the content at its unique top-level comma
    fn split(&mut self, group: TextSpan<'a>, join: Task<'a>) -> Result<(), ParsingError> {
        if !group.is_single_group() {
            return Err(ParsingError::unexpected_text(
                group.start(),
                group.as_str(),
                "text after closing ')'".to_string(),
            ));
        }

        let inner = group.inner();
        trace!(clade = inner.as_str(), "splitting clade");
        let comma = match inner.top_level_positions(b',').as_slice() {
            [] => {
                return Err(ParsingError::missing_comma(
                    group.start(),
                    group.as_str(),
                ));
            }
            [comma] => *comma,
            [_, second, ..] => {
                let position = inner.start() + second;
                return Err(ParsingError::multifurcation(position, group.as_str()));
            }
        };

        // Left on top, so its clade is built first
        self.tasks.push(join);
        self.tasks.push(Task::Clade(inner.sub(comma + 1, inner.len())));
        self.tasks.push(Task::Clade(inner.sub(0, comma)));

        Ok(())
    }

    /// Pops the two most recently built vertices as `(left, right)`.
    fn take_children(&mut self) -> (VertexIndex, VertexIndex) {
        let right = self.built.pop();
        let left = self.built.pop();
        match (left, right) {
            (Some(left), Some(right)) => (left, right),
            // Every join is scheduled below the two clades it joins
            _ => unreachable!("join without two built children"),
        }
    }

    /// Parses leaf label and adds leaf to tree:
    /// - Label must be non-empty and free of whitespace and reserved characters
    fn parse_leaf(
        &mut self,
        label: TextSpan<'_>,
        branch_length: Option<BranchLength>,
    ) -> Result<VertexIndex, ParsingError> {
        if label.is_empty() {
            return Err(ParsingError::empty_clade(label.start(), label.as_str()));
        }

        let text = label.as_str();
        if let Some(offset) =
            text.find(|c: char| c.is_whitespace() || RESERVED_LABEL_CHARS.contains(c))
        {
            let found = text[offset..].chars().next().unwrap_or(' ');
            return Err(ParsingError::invalid_label(
                label.start() + offset,
                text,
                format!("unexpected character {found:?}"),
            ));
        }

        Ok(self.tree.add_leaf(branch_length, text))
    }
}

/// Parses the text after a `:` as non-negative finite [BranchLength].
///
/// Supports scientific notation (e.g., `1.5e-10`).
fn parse_branch_length(span: TextSpan<'_>) -> Result<BranchLength, ParsingError> {
    let span = span.trim();
    let text = span.as_str();
    if text.is_empty() {
        return Err(ParsingError::invalid_branch_length(
            span.start(),
            text,
            "missing value after ':'".to_string(),
        ));
    }

    let value: f64 = text.parse().map_err(|_| {
        ParsingError::invalid_branch_length(span.start(), text, format!("not a number: {text}"))
    })?;

    BranchLength::try_new(value).ok_or_else(|| {
        ParsingError::invalid_branch_length(
            span.start(),
            text,
            format!("must be non-negative and finite, got {value}"),
        )
    })
}
