use serde::{Deserialize, Serialize};

use crate::{
    Block, Cell, CellPatch, Node, NodeKind, NodePath, NodeRef, Row, Table, TablePatch, TreeError,
    DEFAULT_COLUMN_WIDTH,
};

/// The document: a sequence of top-level blocks, some of which are tables.
///
/// All mutation goes through the transform primitives (`insert_node`,
/// `remove_node`, `move_children`, `set_cell_attrs`, `set_table_attrs`). Each
/// primitive ends with a [`Document::normalize`] pass unless a
/// [`Document::without_normalizing`] scope is active; multi-step structural
/// edits run inside such a scope so intermediate states (a row mid-deletion,
/// spans mid-rewrite) are never repaired out from under them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    children: Vec<Node>,

    /// Depth of nested `without_normalizing` scopes. Runtime-only.
    #[serde(skip)]
    normalize_suspended: u32,
}

/// Mutable counterpart of [`NodeRef`], internal to navigation.
enum NodeMut<'a> {
    Table(&'a mut Table),
    Row(&'a mut Row),
    Cell(&'a mut Cell),
    Block(&'a mut Block),
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from host data, normalizing it once.
    pub fn with_children(children: Vec<Node>) -> Self {
        let mut doc = Self {
            children,
            normalize_suspended: 0,
        };
        doc.normalize();
        doc
    }

    /// Top-level blocks in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// All top-level tables with their paths, in document order.
    pub fn tables(&self) -> impl Iterator<Item = (NodePath, &Table)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node {
                Node::Table(table) => Some((NodePath::root(index), table)),
                _ => None,
            })
    }

    /// Resolve a path to a borrowed node. The empty path has no node (the root
    /// is the document itself).
    pub fn node(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        let mut segments = path.as_slice().iter().copied();
        let first = segments.next()?;
        let mut current = match self.children.get(first)? {
            Node::Table(table) => NodeRef::Table(table),
            Node::Row(row) => NodeRef::Row(row),
            Node::Cell(cell) => NodeRef::Cell(cell),
            Node::Block(block) => NodeRef::Block(block),
        };
        for index in segments {
            current = match current {
                NodeRef::Table(table) => NodeRef::Row(table.rows.get(index)?),
                NodeRef::Row(row) => NodeRef::Cell(row.cells.get(index)?),
                NodeRef::Cell(cell) => NodeRef::Block(cell.content.get(index)?),
                NodeRef::Block(_) => return None,
            };
        }
        Some(current)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<NodeMut<'_>> {
        let mut segments = path.as_slice().iter().copied();
        let first = segments.next()?;
        let mut current = match self.children.get_mut(first)? {
            Node::Table(table) => NodeMut::Table(table),
            Node::Row(row) => NodeMut::Row(row),
            Node::Cell(cell) => NodeMut::Cell(cell),
            Node::Block(block) => NodeMut::Block(block),
        };
        for index in segments {
            current = match current {
                NodeMut::Table(table) => NodeMut::Row(table.rows.get_mut(index)?),
                NodeMut::Row(row) => NodeMut::Cell(row.cells.get_mut(index)?),
                NodeMut::Cell(cell) => NodeMut::Block(cell.content.get_mut(index)?),
                NodeMut::Block(_) => return None,
            };
        }
        Some(current)
    }

    /// Returns true if a node (or the root) exists at `path`.
    pub fn contains(&self, path: &NodePath) -> bool {
        path.is_empty() || self.node(path).is_some()
    }

    pub fn table(&self, path: &NodePath) -> Option<&Table> {
        match self.node(path)? {
            NodeRef::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn row(&self, path: &NodePath) -> Option<&Row> {
        match self.node(path)? {
            NodeRef::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn cell(&self, path: &NodePath) -> Option<&Cell> {
        match self.node(path)? {
            NodeRef::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn block(&self, path: &NodePath) -> Option<&Block> {
        match self.node(path)? {
            NodeRef::Block(block) => Some(block),
            _ => None,
        }
    }

    fn table_mut(&mut self, path: &NodePath) -> Option<&mut Table> {
        match self.node_mut(path)? {
            NodeMut::Table(table) => Some(table),
            _ => None,
        }
    }

    fn cell_mut(&mut self, path: &NodePath) -> Option<&mut Cell> {
        match self.node_mut(path)? {
            NodeMut::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    /// Depth-first preorder walk of the whole document.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<(NodePath, NodeRef<'_>)> = Vec::new();
        for (index, node) in self.children.iter().enumerate().rev() {
            stack.push((NodePath::root(index), node_ref(node)));
        }
        Descendants { stack }
    }

    /// Depth-first preorder walk of the subtree rooted at `scope`, including
    /// the scope node itself. Empty when `scope` is stale.
    pub fn descendants_of(&self, scope: &NodePath) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.node(scope) {
            stack.push((scope.clone(), node));
        }
        Descendants { stack }
    }

    /// Insert `node` so that it ends up at `at`, shifting later siblings.
    ///
    /// Fails if the parent does not exist, the index is past the end of the
    /// parent's children, or the node kind is illegal under that parent.
    pub fn insert_node(&mut self, at: &NodePath, node: Node) -> Result<(), TreeError> {
        self.insert_node_raw(at, node)?;
        self.normalize_if_due();
        Ok(())
    }

    fn insert_node_raw(&mut self, at: &NodePath, node: Node) -> Result<(), TreeError> {
        let Some(parent_path) = at.parent() else {
            return Err(TreeError::StalePath(at.clone()));
        };
        // `at` is non-empty, so `last()` is present.
        let Some(index) = at.last() else {
            return Err(TreeError::StalePath(at.clone()));
        };

        if parent_path.is_empty() {
            return match node {
                Node::Table(_) | Node::Block(_) => {
                    insert_at(&mut self.children, &parent_path, index, node)
                }
                other => Err(TreeError::InvalidChild {
                    parent: NodeKind::Document,
                    child: other.kind(),
                }),
            };
        }

        match self.node_mut(&parent_path) {
            None => Err(TreeError::StalePath(parent_path)),
            Some(NodeMut::Table(table)) => match node {
                Node::Row(row) => insert_at(&mut table.rows, &parent_path, index, row),
                other => Err(TreeError::InvalidChild {
                    parent: NodeKind::Table,
                    child: other.kind(),
                }),
            },
            Some(NodeMut::Row(row)) => match node {
                Node::Cell(cell) => insert_at(&mut row.cells, &parent_path, index, cell),
                other => Err(TreeError::InvalidChild {
                    parent: NodeKind::Row,
                    child: other.kind(),
                }),
            },
            Some(NodeMut::Cell(cell)) => match node {
                Node::Block(block) => insert_at(&mut cell.content, &parent_path, index, block),
                other => Err(TreeError::InvalidChild {
                    parent: NodeKind::Cell,
                    child: other.kind(),
                }),
            },
            Some(NodeMut::Block(_)) => Err(TreeError::InvalidChild {
                parent: NodeKind::Block,
                child: node.kind(),
            }),
        }
    }

    /// Remove and return the node at `at`, shifting later siblings left.
    pub fn remove_node(&mut self, at: &NodePath) -> Result<Node, TreeError> {
        let node = self.remove_node_raw(at)?;
        self.normalize_if_due();
        Ok(node)
    }

    fn remove_node_raw(&mut self, at: &NodePath) -> Result<Node, TreeError> {
        let Some(parent_path) = at.parent() else {
            return Err(TreeError::StalePath(at.clone()));
        };
        let Some(index) = at.last() else {
            return Err(TreeError::StalePath(at.clone()));
        };
        let stale = || TreeError::StalePath(at.clone());

        if parent_path.is_empty() {
            if index >= self.children.len() {
                return Err(stale());
            }
            return Ok(self.children.remove(index));
        }

        match self.node_mut(&parent_path) {
            None => Err(stale()),
            Some(NodeMut::Table(table)) => {
                if index >= table.rows.len() {
                    return Err(stale());
                }
                Ok(Node::Row(table.rows.remove(index)))
            }
            Some(NodeMut::Row(row)) => {
                if index >= row.cells.len() {
                    return Err(stale());
                }
                Ok(Node::Cell(row.cells.remove(index)))
            }
            Some(NodeMut::Cell(cell)) => {
                if index >= cell.content.len() {
                    return Err(stale());
                }
                Ok(Node::Block(cell.content.remove(index)))
            }
            Some(NodeMut::Block(_)) => Err(stale()),
        }
    }

    /// Move every content block of cell `from` into cell `to`, inserting at
    /// `to_index` and preserving block order. Returns the number of blocks
    /// moved.
    pub fn move_children(
        &mut self,
        from: &NodePath,
        to: &NodePath,
        to_index: usize,
    ) -> Result<usize, TreeError> {
        if from == to {
            return Err(TreeError::IncompatibleMove {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if self.cell(from).is_none() {
            return Err(TreeError::StalePath(from.clone()));
        }
        let Some(to_cell) = self.cell(to) else {
            return Err(TreeError::StalePath(to.clone()));
        };
        let to_len = to_cell.content.len();
        if to_index > to_len {
            return Err(TreeError::IndexOutOfBounds {
                parent: to.clone(),
                index: to_index,
                len: to_len,
            });
        }

        let Some(from_cell) = self.cell_mut(from) else {
            return Err(TreeError::StalePath(from.clone()));
        };
        let blocks = std::mem::take(&mut from_cell.content);
        let count = blocks.len();

        let Some(to_cell) = self.cell_mut(to) else {
            // Taking content does not change the tree shape, so `to` should
            // still resolve; restore on the off chance it does not.
            if let Some(from_cell) = self.cell_mut(from) {
                from_cell.content = blocks;
            }
            return Err(TreeError::StalePath(to.clone()));
        };
        to_cell.content.splice(to_index..to_index, blocks);

        self.normalize_if_due();
        Ok(count)
    }

    /// Apply a partial attribute update to the cell at `at`.
    pub fn set_cell_attrs(&mut self, at: &NodePath, patch: &CellPatch) -> Result<(), TreeError> {
        let Some(cell) = self.cell_mut(at) else {
            return Err(TreeError::StalePath(at.clone()));
        };
        cell.apply(patch);
        self.normalize_if_due();
        Ok(())
    }

    /// Apply a partial attribute update to the table at `at`.
    pub fn set_table_attrs(&mut self, at: &NodePath, patch: &TablePatch) -> Result<(), TreeError> {
        let Some(table) = self.table_mut(at) else {
            return Err(TreeError::StalePath(at.clone()));
        };
        table.apply(patch);
        self.normalize_if_due();
        Ok(())
    }

    /// Run `f` with normalization deferred to scope exit.
    ///
    /// Scopes nest; the single pass runs when the outermost scope closes.
    pub fn without_normalizing<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.normalize_suspended += 1;
        let result = f(self);
        self.normalize_suspended -= 1;
        if self.normalize_suspended == 0 {
            self.normalize();
        }
        result
    }

    fn normalize_if_due(&mut self) {
        if self.normalize_suspended == 0 {
            self.normalize();
        }
    }

    /// One consistency pass over the whole document:
    /// - tables with no cells at all are dropped; rows that merely have no
    ///   cells stay, because a vertical merge from an earlier row may cover
    ///   them and removing them would shift every path below;
    /// - every cell keeps at least one content block;
    /// - spans are clamped to `>= 1`;
    /// - `column_widths` is padded/truncated to the grid column count.
    pub fn normalize(&mut self) {
        let mut i = 0;
        while i < self.children.len() {
            let keep = match &mut self.children[i] {
                Node::Table(table) => {
                    if table.rows.iter().all(|row| row.cells.is_empty()) {
                        false
                    } else {
                        for row in &mut table.rows {
                            for cell in &mut row.cells {
                                cell.row_span = cell.row_span.max(1);
                                cell.col_span = cell.col_span.max(1);
                                if cell.content.is_empty() {
                                    cell.content.push(Block::default());
                                }
                            }
                        }
                        let width = table.grid_column_count();
                        if table.column_widths.len() != width {
                            table.column_widths.resize(width, DEFAULT_COLUMN_WIDTH);
                        }
                        true
                    }
                }
                _ => true,
            };
            if keep {
                i += 1;
            } else {
                self.children.remove(i);
            }
        }
    }
}

fn node_ref(node: &Node) -> NodeRef<'_> {
    match node {
        Node::Table(table) => NodeRef::Table(table),
        Node::Row(row) => NodeRef::Row(row),
        Node::Cell(cell) => NodeRef::Cell(cell),
        Node::Block(block) => NodeRef::Block(block),
    }
}

fn insert_at<T>(
    children: &mut Vec<T>,
    parent: &NodePath,
    index: usize,
    value: T,
) -> Result<(), TreeError> {
    if index > children.len() {
        return Err(TreeError::IndexOutOfBounds {
            parent: parent.clone(),
            index,
            len: children.len(),
        });
    }
    children.insert(index, value);
    Ok(())
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    stack: Vec<(NodePath, NodeRef<'a>)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodePath, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        match node {
            NodeRef::Table(table) => {
                for (index, row) in table.rows.iter().enumerate().rev() {
                    self.stack.push((path.child(index), NodeRef::Row(row)));
                }
            }
            NodeRef::Row(row) => {
                for (index, cell) in row.cells.iter().enumerate().rev() {
                    self.stack.push((path.child(index), NodeRef::Cell(cell)));
                }
            }
            NodeRef::Cell(cell) => {
                for (index, block) in cell.content.iter().enumerate().rev() {
                    self.stack.push((path.child(index), NodeRef::Block(block)));
                }
            }
            NodeRef::Block(_) => {}
        }
        Some((path, node))
    }
}
