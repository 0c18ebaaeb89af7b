/// Generic tree-sitter node helpers shared by the C++ provider.
use crate::parser::syntax::Extent;

/// Extract the source text for a tree-sitter node.
pub fn node_text<'a>(node: &tree_sitter::Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// 1-based start line for a tree-sitter node.
pub fn span_start_line(node: &tree_sitter::Node) -> usize {
    node.start_position().row + 1
}

/// 1-based line/column extent. Columns are byte offsets, like the rest of the pipeline.
pub fn extent(node: &tree_sitter::Node) -> Extent {
    let start = node.start_position();
    let end = node.end_position();
    Extent {
        start_line: start.row + 1,
        start_col: start.column + 1,
        end_line: end.row + 1,
        end_col: end.column + 1,
    }
}

/// Named children collected eagerly, so callers can recurse without holding the cursor.
pub fn named_children<'t>(node: &tree_sitter::Node<'t>) -> Vec<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children, named or not.
pub fn children<'t>(node: &tree_sitter::Node<'t>) -> Vec<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}
