use crate::ValueAstNode;

/// What a visitor wants done with the node it was just handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkAction {
    Continue,
    /// Do not descend into the children of this node.
    Skip,
    /// Replace the node with zero or more nodes once the walk is over.
    Replace(Vec<ValueAstNode>),
}

/// Position of the visited node inside the tree.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext<'a> {
    pub parent: Option<&'a ValueAstNode>,
    pub siblings: &'a [ValueAstNode],
    pub index: usize,
    /// Child indices from the root down to this node. Stable for the whole walk.
    pub path: &'a [usize],
}

impl<'a> WalkContext<'a> {
    pub fn previous(&self) -> Option<&'a ValueAstNode> {
        self.index.checked_sub(1).and_then(|idx| self.siblings.get(idx))
    }

    pub fn next(&self) -> Option<&'a ValueAstNode> {
        self.siblings.get(self.index + 1)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.siblings.len()
    }

    /// Path of a sibling of the visited node.
    pub fn sibling_path(&self, index: usize) -> Vec<usize> {
        let mut path = self.path.to_vec();
        if let Some(last) = path.last_mut() {
            *last = index;
        }
        path
    }
}

type Edit = (Vec<usize>, Vec<ValueAstNode>);

/// Depth-first traversal.
///
/// The tree is only read while the visitor runs; replacements are recorded
/// by path and spliced in afterwards, deepest and right-most first, so no
/// recorded path is invalidated by an earlier splice.
pub fn walk<F>(ast: &mut Vec<ValueAstNode>, mut visitor: F)
where
    F: FnMut(&ValueAstNode, &WalkContext<'_>) -> WalkAction,
{
    let mut edits = Vec::new();
    let mut path = Vec::new();
    visit(ast, None, &mut path, &mut visitor, &mut edits);

    edits.sort_by(|(left, _), (right, _)| right.cmp(left));
    for (path, replacement) in edits {
        splice(ast, &path, replacement);
    }
}

fn visit<F>(
    nodes: &[ValueAstNode],
    parent: Option<&ValueAstNode>,
    path: &mut Vec<usize>,
    visitor: &mut F,
    edits: &mut Vec<Edit>,
) where
    F: FnMut(&ValueAstNode, &WalkContext<'_>) -> WalkAction,
{
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        let action = visitor(
            node,
            &WalkContext {
                parent,
                siblings: nodes,
                index,
                path: path.as_slice(),
            },
        );
        match action {
            WalkAction::Continue => {
                if let ValueAstNode::Function { nodes: children, .. } = node {
                    visit(children, Some(node), path, visitor, edits);
                }
            }
            WalkAction::Skip => {}
            WalkAction::Replace(replacement) => edits.push((path.clone(), replacement)),
        }
        path.pop();
    }
}

fn splice(ast: &mut Vec<ValueAstNode>, path: &[usize], replacement: Vec<ValueAstNode>) {
    let Some((&last, parents)) = path.split_last() else {
        return;
    };
    let mut target = ast;
    for &idx in parents {
        target = match target.get_mut(idx) {
            Some(ValueAstNode::Function { nodes, .. }) => nodes,
            _ => return,
        };
    }
    if last < target.len() {
        target.splice(last..=last, replacement);
    }
}
