/// Convert a tree-sitter C++ parse tree into a provider-agnostic SyntaxNode tree.
use std::path::{Path, PathBuf};

use crate::parser::kinds::{NodeKind, TokenKind};
use crate::parser::syntax::{SyntaxNode, Token};
use crate::parser::treesitter::cursor::{
    children, extent, named_children, node_text, span_start_line,
};

/// Walk context passed through the recursion.
struct CppWalkCtx<'s> {
    source: &'s str,
    file: PathBuf,
}

impl CppWalkCtx<'_> {
    fn node(&self, kind: NodeKind, spelling: impl Into<String>, line: usize) -> SyntaxNode {
        SyntaxNode::new(kind, spelling, line).with_file(self.file.clone())
    }
}

/// Walk a parsed C++ tree and produce the syntax tree rooted at the translation unit.
pub fn walk_cpp_file(tree: &tree_sitter::Tree, source: &str, file: &Path) -> SyntaxNode {
    let ctx = CppWalkCtx {
        source,
        file: file.to_path_buf(),
    };
    let root = tree.root_node();
    let name = file
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    ctx.node(NodeKind::TranslationUnit, name, 1)
        .with_children(walk_children(&ctx, &root, None))
}

/// Walk all named children of a node. `class` is the enclosing class when
/// the children sit directly in a class body.
fn walk_children(
    ctx: &CppWalkCtx<'_>,
    node: &tree_sitter::Node,
    class: Option<&str>,
) -> Vec<SyntaxNode> {
    named_children(node)
        .iter()
        .map(|child| walk_node(ctx, child, class))
        .collect()
}

/// Dispatch a single tree-sitter node.
fn walk_node(ctx: &CppWalkCtx<'_>, node: &tree_sitter::Node, class: Option<&str>) -> SyntaxNode {
    match node.kind() {
        "function_definition" => walk_function(ctx, node, class),
        "field_declaration" => walk_declaration(ctx, node, class, NodeKind::Field),
        "declaration" => walk_declaration(ctx, node, class, NodeKind::Variable),
        "class_specifier" | "struct_specifier" | "union_specifier" => walk_class(ctx, node),
        // Statements never define methods, whatever encloses them
        "compound_statement" => walk_generic(ctx, node, None),
        _ => walk_generic(ctx, node, class),
    }
}

fn walk_generic(ctx: &CppWalkCtx<'_>, node: &tree_sitter::Node, class: Option<&str>) -> SyntaxNode {
    ctx.node(NodeKind::Other(node.kind().to_string()), "", span_start_line(node))
        .with_children(walk_children(ctx, node, class))
}

fn walk_class(ctx: &CppWalkCtx<'_>, node: &tree_sitter::Node) -> SyntaxNode {
    let name = node
        .child_by_field_name("name")
        .map(|n| strip_template_args(node_text(&n, ctx.source)));
    ctx.node(
        NodeKind::Other(node.kind().to_string()),
        name.unwrap_or_default(),
        span_start_line(node),
    )
    .with_children(walk_children(ctx, node, name))
}

fn walk_function(ctx: &CppWalkCtx<'_>, node: &tree_sitter::Node, class: Option<&str>) -> SyntaxNode {
    let declarator = node.child_by_field_name("declarator");
    let line = declarator.as_ref().map_or_else(|| span_start_line(node), span_start_line);

    let (kind, name) = declarator
        .and_then(find_function_declarator)
        .map(|f| classify_function(ctx, &f, class))
        .unwrap_or_else(|| (NodeKind::Other(node.kind().to_string()), String::new()));

    let body = if kind.is_method_like() {
        node.child_by_field_name("body")
            .filter(|b| b.kind() == "compound_statement")
            .map(|b| body_tokens(ctx, &b))
    } else {
        None
    };

    let syntax = ctx
        .node(kind, name, line)
        .with_children(walk_children(ctx, node, None));
    match body {
        Some(tokens) => syntax.with_body(tokens),
        None => syntax,
    }
}

/// Fields and variables. A declarator that declares a function makes this a
/// prototype, which carries no member comment.
fn walk_declaration(
    ctx: &CppWalkCtx<'_>,
    node: &tree_sitter::Node,
    class: Option<&str>,
    data_kind: NodeKind,
) -> SyntaxNode {
    let declarator = node.child_by_field_name("declarator");
    let kind = match declarator {
        Some(d) if !declares_function(d) => data_kind,
        _ => NodeKind::Other(node.kind().to_string()),
    };
    let name = declarator
        .and_then(|d| declarator_name(&d, ctx.source))
        .unwrap_or_default();
    let line = declarator.as_ref().map_or_else(|| span_start_line(node), span_start_line);

    ctx.node(kind, name, line)
        .with_children(walk_children(ctx, node, class))
}

/// Decide between method, constructor, destructor and free function.
fn classify_function(
    ctx: &CppWalkCtx<'_>,
    function: &tree_sitter::Node,
    class: Option<&str>,
) -> (NodeKind, String) {
    let Some(target) = function.child_by_field_name("declarator") else {
        return (NodeKind::Other("function_definition".into()), String::new());
    };

    match target.kind() {
        // Out-of-class definition: Foo::Bar, Foo::Foo, Foo::~Foo
        "qualified_identifier" => {
            let (scope, name) = split_qualified(target, ctx.source);
            let kind = if name.starts_with('~') {
                NodeKind::Destructor
            } else if scope.is_some_and(|s| s == name) {
                NodeKind::Constructor
            } else {
                NodeKind::Method
            };
            (kind, name.to_string())
        }
        "destructor_name" => (NodeKind::Destructor, node_text(&target, ctx.source).to_string()),
        _ => {
            let name = node_text(&target, ctx.source);
            match class {
                Some(class) if strip_template_args(name) == class => {
                    (NodeKind::Constructor, name.to_string())
                }
                Some(_) => (NodeKind::Method, name.to_string()),
                None => (NodeKind::Other("function_definition".into()), name.to_string()),
            }
        }
    }
}

/// Split `A::B::name` into the innermost scope (`B`) and the name.
fn split_qualified<'s>(node: tree_sitter::Node, source: &'s str) -> (Option<&'s str>, &'s str) {
    let mut scope = None;
    let mut current = node;
    while current.kind() == "qualified_identifier" {
        if let Some(s) = current.child_by_field_name("scope") {
            scope = Some(strip_template_args(node_text(&s, source)));
        }
        match current.child_by_field_name("name") {
            Some(name) => current = name,
            None => break,
        }
    }
    (scope, node_text(&current, source))
}

fn strip_template_args(name: &str) -> &str {
    name.split('<').next().unwrap_or(name).trim()
}

/// The declarator one level in. Reference and parenthesized declarators have no field name.
fn inner_declarator<'t>(node: tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    node.child_by_field_name("declarator")
        .or_else(|| node.named_child(0))
}

/// Find the function declarator behind pointer/reference wrappers, if any.
fn find_function_declarator(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    match node.kind() {
        "function_declarator" => Some(node),
        "pointer_declarator" | "reference_declarator" | "parenthesized_declarator"
        | "attributed_declarator" => inner_declarator(node).and_then(find_function_declarator),
        _ => None,
    }
}

/// True for prototypes; false for function pointers, whose function
/// declarator wraps a parenthesized declarator.
fn declares_function(declarator: tree_sitter::Node) -> bool {
    find_function_declarator(declarator).is_some_and(|f| {
        f.child_by_field_name("declarator")
            .is_some_and(|d| d.kind() != "parenthesized_declarator")
    })
}

/// Recursively extract the identifier name from a declarator chain.
///
/// `Int_t *fArray[3]` produces `pointer_declarator → array_declarator →
/// field_identifier`; this walks inward to find the name.
fn declarator_name(node: &tree_sitter::Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
        | "operator_name" => Some(node_text(node, source).to_string()),
        "qualified_identifier" => node
            .child_by_field_name("name")
            .and_then(|n| declarator_name(&n, source)),
        "pointer_declarator" | "reference_declarator" | "array_declarator"
        | "function_declarator" | "parenthesized_declarator" | "attributed_declarator"
        | "init_declarator" | "bitfield_clause" => {
            inner_declarator(*node).and_then(|d| declarator_name(&d, source))
        }
        _ => named_children(node)
            .iter()
            .find_map(|child| declarator_name(child, source)),
    }
}

/// Flatten a compound statement into its leaf tokens, comments included.
fn body_tokens(ctx: &CppWalkCtx<'_>, body: &tree_sitter::Node) -> Vec<Token> {
    let mut tokens = Vec::new();
    collect_tokens(ctx, body, &mut tokens);
    tokens
}

fn collect_tokens(ctx: &CppWalkCtx<'_>, node: &tree_sitter::Node, out: &mut Vec<Token>) {
    if node.kind() == "comment" || node.child_count() == 0 {
        // Error recovery inserts zero-width MISSING tokens; they were never in the source.
        if node.byte_range().is_empty() {
            return;
        }
        out.push(Token {
            kind: token_kind(node),
            spelling: node_text(node, ctx.source).to_string(),
            extent: extent(node),
        });
        return;
    }
    for child in children(node) {
        collect_tokens(ctx, &child, out);
    }
}

fn token_kind(node: &tree_sitter::Node) -> TokenKind {
    if node.kind() == "comment" {
        TokenKind::Comment
    } else if !node.is_named()
        && !node
            .kind()
            .chars()
            .any(|c| c.is_alphanumeric() || c == '_')
    {
        TokenKind::Punctuation
    } else {
        TokenKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::treesitter::{self, TsLanguage};

    fn walk(source: &str) -> SyntaxNode {
        let tree = treesitter::parse(source, TsLanguage::Cpp).expect("parse");
        walk_cpp_file(&tree, source, Path::new("Point.cxx"))
    }

    fn flatten(node: &SyntaxNode) -> Vec<&SyntaxNode> {
        let mut out = vec![node];
        for child in &node.children {
            out.extend(flatten(child));
        }
        out
    }

    fn find<'a>(root: &'a SyntaxNode, name: &str) -> Vec<&'a SyntaxNode> {
        flatten(root)
            .into_iter()
            .filter(|n| n.spelling == name)
            .collect()
    }

    #[test]
    fn test_root_is_translation_unit() {
        let root = walk("int x;\n");
        assert_eq!(root.kind, NodeKind::TranslationUnit);
        assert_eq!(root.spelling, "Point.cxx");
        assert_eq!(root.file.as_deref(), Some(Path::new("Point.cxx")));
    }

    #[test]
    fn test_out_of_class_method() {
        let root = walk("Double_t Point::Norm() const\n{\n  // Norm.\n  return 0;\n}\n");
        let nodes = find(&root, "Norm");
        assert_eq!(nodes.len(), 1);
        let method = nodes[0];
        assert_eq!(method.kind, NodeKind::Method);
        assert_eq!(method.line, 1);

        let body = method.body.as_ref().expect("method body");
        assert!(body[0].is_punctuation("{"));
        assert!(body[1].is_comment());
        assert_eq!(body[1].spelling, "// Norm.");
        assert_eq!(body[1].extent.start_line, 3);
        assert_eq!(body[1].extent.start_col, 3);
    }

    #[test]
    fn test_constructor_and_destructor() {
        let root = walk("Point::Point() : fX(0)\n{\n}\n\nPoint::~Point()\n{\n}\n");
        let ctors: Vec<_> = flatten(&root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Constructor)
            .collect();
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].spelling, "Point");

        let dtors: Vec<_> = flatten(&root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Destructor)
            .collect();
        assert_eq!(dtors.len(), 1);
        assert_eq!(dtors[0].spelling, "~Point");
        assert_eq!(dtors[0].line, 5);
    }

    #[test]
    fn test_free_function_is_not_a_method() {
        let root = walk("void helper()\n{\n  // not documented this way\n}\n");
        let nodes = find(&root, "helper");
        assert_eq!(nodes.len(), 1);
        assert!(!nodes[0].kind.is_method_like());
        assert!(nodes[0].body.is_none());
    }

    #[test]
    fn test_class_members() {
        let source = "class Point {\npublic:\n  void Clear();\n  Double_t fX; // x\n  Int_t fN[3]; //[3] counts\n  void Set(Double_t x) { fX = x; }\n};\n";
        let root = walk(source);

        let fields: Vec<_> = flatten(&root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Field)
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].spelling, "fX");
        assert_eq!(fields[0].line, 4);
        assert_eq!(fields[1].spelling, "fN");
        assert_eq!(fields[1].line, 5);

        let set = find(&root, "Set");
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].kind, NodeKind::Method);
        assert!(set[0].body.is_some());

        // The prototype is neither a field nor a documented method body
        assert!(flatten(&root)
            .iter()
            .filter(|n| n.spelling == "Clear")
            .all(|n| n.kind != NodeKind::Field && n.body.is_none()));
    }

    #[test]
    fn test_global_variable() {
        let root = walk("Int_t gCount = 0; // global counter\n");
        let nodes = find(&root, "gCount");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Variable);
        assert_eq!(nodes[0].line, 1);
    }

    #[test]
    fn test_function_pointer_is_a_variable() {
        let root = walk("void (*gHandler)(int);\n");
        let nodes = find(&root, "gHandler");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Variable);
    }

    #[test]
    fn test_multi_line_comment_token() {
        let root = walk("void A::f()\n{\n  /* one\n     two */\n  g();\n}\n");
        let body = find(&root, "f")[0].body.clone().expect("body");
        let comment = &body[1];
        assert!(comment.is_comment());
        assert_eq!(comment.extent.start_line, 3);
        assert_eq!(comment.extent.end_line, 4);
        assert!(!comment.extent.is_single_line());
    }

    #[test]
    fn test_strip_template_args() {
        assert_eq!(strip_template_args("TMatrixT<Element>"), "TMatrixT");
        assert_eq!(strip_template_args("Point"), "Point");
    }
}
