//! Bracket-aware view on a piece of Newick text.
//!
//! This module provides [TextSpan], a window into the input string that
//! remembers its absolute byte offsets, so that errors can point to the
//! position of the offending text. All structural characters of the Newick
//! grammar are ASCII, hence scanning bytes never splits a UTF-8 character.

/// A window `[start, end)` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan<'a> {
    source: &'a str,
    start: usize,
    end: usize,
}

impl<'a> TextSpan<'a> {
    /// Creates a span covering all of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            end: source.len(),
        }
    }

    /// Returns the text of this span.
    pub fn as_str(&self) -> &'a str {
        &self.source[self.start..self.end]
    }

    /// Returns the absolute byte offset of the start of this span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the absolute byte offset just past the end of this span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the sub-span `[from, to)`, given relative to this span.
    ///
    /// # Panics
    /// Panics if `from > to` or `to > self.len()`.
    pub fn sub(&self, from: usize, to: usize) -> Self {
        assert!(from <= to && to <= self.len());
        Self {
            source: self.source,
            start: self.start + from,
            end: self.start + to,
        }
    }

    /// Returns this span without leading and trailing whitespace.
    pub fn trim(&self) -> Self {
        let text = self.as_str();
        let leading = text.len() - text.trim_start().len();
        let trimmed_len = text.trim().len();
        self.sub(leading, leading + trimmed_len)
    }

    /// Returns `true` if the span starts with the given byte.
    pub fn starts_with(&self, byte: u8) -> bool {
        self.as_str().as_bytes().first() == Some(&byte)
    }

    /// Returns the absolute position of the first parenthesis without partner:
    /// a `)` closing more than was opened, or else the outermost `(` never closed.
    ///
    /// # Returns
    /// `None` if parentheses are balanced.
    pub fn first_unbalanced(&self) -> Option<usize> {
        let mut open_positions = Vec::new();
        for (offset, byte) in self.as_str().bytes().enumerate() {
            match byte {
                b'(' => open_positions.push(offset),
                b')' => {
                    if open_positions.pop().is_none() {
                        return Some(self.start + offset);
                    }
                }
                _ => {}
            }
        }
        open_positions.first().map(|offset| self.start + offset)
    }

    /// Returns the relative offsets of all occurrences of `target`
    /// outside of any parentheses.
    ///
    /// Expects balanced parentheses.
    pub fn top_level_positions(&self, target: u8) -> Vec<usize> {
        let mut depth: usize = 0;
        let mut positions = Vec::new();
        for (offset, byte) in self.as_str().bytes().enumerate() {
            match byte {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ if byte == target && depth == 0 => positions.push(offset),
                _ => {}
            }
        }
        positions
    }

    /// Splits off a branch-length suffix, i.e. the text after the last
    /// top-level `:`.
    ///
    /// # Returns
    /// `(content, Some(length_text))` if there is a top-level colon,
    /// `(self, None)` otherwise
    pub fn split_branch_length(&self) -> (Self, Option<Self>) {
        match self.top_level_positions(b':').last() {
            Some(&colon) => (self.sub(0, colon), Some(self.sub(colon + 1, self.len()))),
            None => (*self, None),
        }
    }

    /// Returns `true` if the span is one parenthesized group, that is,
    /// it starts with `(` and the matching `)` is its last byte.
    pub fn is_single_group(&self) -> bool {
        if !self.starts_with(b'(') {
            return false;
        }

        let mut depth: usize = 0;
        for (offset, byte) in self.as_str().bytes().enumerate() {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return offset + 1 == self.len();
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Returns the span between the outer parentheses of a single group.
    ///
    /// Expects [TextSpan::is_single_group] to hold.
    pub fn inner(&self) -> Self {
        self.sub(1, self.len() - 1)
    }
}
