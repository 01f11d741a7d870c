//! Graphviz export of the tree shape, for debugging balance issues.

use core::fmt;

use allocator_api2::alloc::Allocator;

use crate::RBTree;
use crate::node::{Color, NodeRef};
use crate::rotate::Side;

/// Renders an [`RBTree`] in the graphviz `dot` language.
///
/// Returned by [`RBTree::dot`]. Nodes are labelled with their key and filled
/// with their color; edges to children are labelled with the side.
pub struct Dot<'a, K, V, C, A: Allocator> {
    tree: &'a RBTree<K, V, C, A>,
}

impl<K: fmt::Debug, V, C, A: Allocator> Dot<'_, K, V, C, A> {
    fn node_fmt(&self, f: &mut fmt::Formatter<'_>, node: NodeRef) -> fmt::Result {
        let pool = &self.tree.pool;
        let id = node.index();
        let fill = match pool.color(node) {
            Color::Red => "red",
            Color::Black => "black",
        };
        writeln!(
            f,
            r#"  {id} [label="{key:?}", style=filled, fillcolor={fill}, fontcolor=white];"#,
            key = pool.get(node).key,
        )?;

        for side in [Side::Left, Side::Right] {
            if let Some(child) = pool.child(node, side) {
                writeln!(f, r#"  {id} -> {} [label="{side}"];"#, child.index())?;
                self.node_fmt(f, child)?;
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V, C, A: Allocator> fmt::Display for Dot<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("digraph {\n")?;
        if let Some(root) = self.tree.root {
            self.node_fmt(f, root)?;
        }
        f.write_str("}\n")
    }
}

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Returns a value whose [`Display`](fmt::Display) implementation renders
    /// the tree as a graphviz digraph.
    #[inline]
    pub fn dot(&self) -> Dot<'_, K, V, C, A> {
        Dot { tree: self }
    }
}
