use core::fmt;

use smallvec::SmallVec;

/// The position of a node in the document tree, as child indexes from the root.
///
/// Paths are **0-indexed** at every level. For a cell the segments read
/// `[table, row, cell]`; a content block inside that cell appends one more
/// segment. The empty path addresses the document root itself.
///
/// Lexicographic ordering of paths equals document order (a parent sorts
/// before its descendants, earlier siblings before later ones), so edits that
/// must not invalidate pending paths sort targets with [`Ord`] reversed and
/// delete back-to-front.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(SmallVec<[usize; 4]>);

impl NodePath {
    /// The empty path, addressing the document root.
    #[inline]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Path of the `index`-th top-level block.
    #[inline]
    pub fn root(index: usize) -> Self {
        let mut segments = SmallVec::new();
        segments.push(index);
        Self(segments)
    }

    /// Returns the path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.0.push(index);
        child
    }

    /// Appends one segment in place.
    #[inline]
    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// Returns the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(SmallVec::from_slice(&self.0[..self.0.len() - 1])))
    }

    /// The final segment: this node's index within its parent.
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns true if `self` is `other` or an ancestor of `other`.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other.0.len() > self.0.len() && self.is_prefix_of(other)
    }

    /// The first `len` segments as a new path.
    ///
    /// Used to walk a position's ancestor chain from the root down.
    pub fn truncated(&self, len: usize) -> Self {
        Self(SmallVec::from_slice(&self.0[..len.min(self.0.len())]))
    }
}

impl From<&[usize]> for NodePath {
    fn from(segments: &[usize]) -> Self {
        Self(SmallVec::from_slice(segments))
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(segments: [usize; N]) -> Self {
        Self(SmallVec::from_slice(&segments))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A caret location: a node path plus a character/child offset inside it.
///
/// The offset is opaque to this crate; the engine only compares positions and
/// walks `path` ancestors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub path: NodePath,
    pub offset: usize,
}

impl Position {
    #[inline]
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// A selection range between two positions.
///
/// `anchor`/`focus` keep the user's drag direction; [`Range::start`] and
/// [`Range::end`] give the endpoints in document order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub anchor: Position,
    pub focus: Position,
}

impl Range {
    #[inline]
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed range (caret) at `position`.
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }

    /// Returns true if both endpoints coincide.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The endpoint that comes first in document order.
    pub fn start(&self) -> &Position {
        if self.anchor <= self.focus {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// The endpoint that comes last in document order.
    pub fn end(&self) -> &Position {
        if self.anchor <= self.focus {
            &self.focus
        } else {
            &self.anchor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ordering_is_document_order() {
        let parent = NodePath::from([0, 1]);
        let child = NodePath::from([0, 1, 0]);
        let later_sibling = NodePath::from([0, 2]);

        assert!(parent < child);
        assert!(child < later_sibling);

        let mut paths = vec![later_sibling.clone(), parent.clone(), child.clone()];
        paths.sort();
        assert_eq!(paths, vec![parent, child, later_sibling]);
    }

    #[test]
    fn parent_and_child_round_trip() {
        let cell = NodePath::from([2, 0, 3]);
        assert_eq!(cell.parent(), Some(NodePath::from([2, 0])));
        assert_eq!(cell.parent().unwrap().child(3), cell);
        assert_eq!(cell.last(), Some(3));
        assert_eq!(NodePath::new().parent(), None);
    }

    #[test]
    fn prefix_checks() {
        let table = NodePath::root(1);
        let cell = NodePath::from([1, 0, 0]);
        assert!(table.is_prefix_of(&cell));
        assert!(table.is_ancestor_of(&cell));
        assert!(!cell.is_ancestor_of(&table));
        assert!(cell.is_prefix_of(&cell));
        assert!(!cell.is_ancestor_of(&cell));
        assert!(!NodePath::root(0).is_prefix_of(&cell));
    }

    #[test]
    fn truncated_walks_ancestors() {
        let block = NodePath::from([1, 2, 3, 0]);
        assert_eq!(block.truncated(0), NodePath::new());
        assert_eq!(block.truncated(1), NodePath::root(1));
        assert_eq!(block.truncated(3), NodePath::from([1, 2, 3]));
        assert_eq!(block.truncated(9), block);
    }

    #[test]
    fn display_is_dotted() {
        assert_eq!(NodePath::from([0, 4, 2]).to_string(), "0.4.2");
        assert_eq!(NodePath::new().to_string(), "root");
    }

    #[test]
    fn range_orders_endpoints() {
        let early = Position::new(NodePath::from([0, 0, 0, 0]), 1);
        let late = Position::new(NodePath::from([0, 2, 1, 0]), 0);
        let backwards = Range::new(late.clone(), early.clone());

        assert_eq!(backwards.start(), &early);
        assert_eq!(backwards.end(), &late);
        assert!(!backwards.is_collapsed());
        assert!(Range::collapsed(early).is_collapsed());
    }

    #[test]
    fn offset_breaks_position_ties() {
        let a = Position::new(NodePath::from([0, 0, 0, 0]), 2);
        let b = Position::new(NodePath::from([0, 0, 0, 0]), 5);
        let range = Range::new(b.clone(), a.clone());
        assert_eq!(range.start(), &a);
        assert_eq!(range.end(), &b);
    }
}
