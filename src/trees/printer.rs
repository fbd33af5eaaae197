use super::node::{ClassCounts, TreeNode};
use std::fmt::{self, Display, Formatter};

/// Indentation emitted once per level of depth.
pub const INDENT: &str = "|  ";

/// Text rendering of a fitted tree.
///
/// Every internal node prints two lines, `<attr> = 0 :` then `<attr> = 1 :`.
/// A branch ending in a leaf gets the leaf's class on the same line; a branch
/// ending in another test continues on the following lines, one level deeper.
///
/// ```text
/// a = 0 :
/// |  b = 0 : 0
/// |  b = 1 : 1
/// a = 1 : 1
/// ```
///
/// A tree consisting of a single leaf prints as `: <class>`.
pub struct TreeDisplay<'a> {
    root: &'a TreeNode,
    attributes: &'a [String],
    global: ClassCounts,
}

impl<'a> TreeDisplay<'a> {
    pub fn new(root: &'a TreeNode, attributes: &'a [String], global: ClassCounts) -> Self {
        Self {
            root,
            attributes,
            global,
        }
    }

    fn write_node(&self, f: &mut Formatter<'_>, node: &TreeNode, level: usize) -> fmt::Result {
        let Some(split) = node.split_data() else {
            return Ok(());
        };
        let name = &self.attributes[split.attribute];

        for (value, child) in [(0, &split.zero), (1, &split.one)] {
            write!(f, "{}{} = {} :", INDENT.repeat(level), name, value)?;
            if child.is_leaf() {
                writeln!(f, " {}", child.dominant_class(self.global))?;
            } else {
                writeln!(f)?;
                self.write_node(f, child, level + 1)?;
            }
        }
        Ok(())
    }
}

impl Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.root.is_leaf() {
            return writeln!(f, ": {}", self.root.dominant_class(self.global));
        }
        self.write_node(f, self.root, 0)
    }
}
