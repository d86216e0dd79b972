//! First-error search over an analysis tree
//!
//! Only one diagnostic is ever surfaced. The search is a pre-order walk that
//! stops at the first `Error` node it meets, probing each node's lists in the
//! order `rules`, `declarations`, `alternatives`. For a bison file this means
//! a rule error wins over a declaration error, whatever their source
//! positions.
//!
//! The result is derived, never cached: callers recompute it whenever the
//! tree changes.

use crate::ast::AstNode;

/// Where the first syntax error sits, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Find the first error node under `root`, `root` included.
///
/// Walks with an explicit stack so that arbitrarily deep engine output cannot
/// exhaust the call stack.
pub fn find_first_error(root: &AstNode) -> Option<LocatedError> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let AstNode::Error(err) = node {
            return Some(LocatedError {
                line: err.line.max(1),
                column: err.column.max(1),
                message: err.message.clone(),
            });
        }

        // Push in reverse so the first child of the first list pops next.
        for list in node.child_lists().iter().rev() {
            stack.extend(list.iter().rev());
        }
    }

    None
}
