//! Java syntax for source rewriting.
//!
//! [`parse`] produces a [`SyntaxTree`]: an arena of immutable nodes, each tagged with its source
//! span, plus the lossless token stream (comments and whitespace included) the tree was built
//! from. The fragment parsers produce small standalone trees used to splice user-provided code
//! into an edited tree.

mod kind;
mod lexer;
mod parser;
mod token;
mod tree;

use thiserror::Error;

use jrewrite_core::TextRange;

pub use kind::{Accepts, Delimiter, ListSpec, NodeKind, Separator, Shape, SlotSpec};
pub use lexer::{lex, Lexer};
pub use token::{Token, TokenKind};
pub use tree::{debug_dump, DebugDump, NodeArena, NodeData, NodeId, Origin, SyntaxTree};

use parser::{parse_entry, Entry};

/// A syntax error in a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// A syntax error in a code fragment supplied for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse fragment `{fragment}` at offset {position}: {message}")]
pub struct FragmentError {
    pub fragment: String,
    pub position: u32,
    pub message: String,
}

impl FragmentError {
    fn from_parse(fragment: &str, err: ParseError) -> Self {
        Self {
            fragment: fragment.to_string(),
            position: err.range.start().into(),
            message: err.message,
        }
    }
}

/// Parse a whole compilation unit.
pub fn parse(text: &str) -> Result<SyntaxTree, ParseError> {
    parse_entry(text, Entry::CompilationUnit)
}

/// Parse `{ ... }` as a block.
pub fn parse_block_fragment(text: &str) -> Result<SyntaxTree, FragmentError> {
    parse_entry(text, Entry::Block).map_err(|err| FragmentError::from_parse(text, err))
}

/// Parse a single statement, terminator included.
pub fn parse_statement_fragment(text: &str) -> Result<SyntaxTree, FragmentError> {
    parse_entry(text, Entry::Statement).map_err(|err| FragmentError::from_parse(text, err))
}

pub fn parse_expression_fragment(text: &str) -> Result<SyntaxTree, FragmentError> {
    parse_entry(text, Entry::Expression).map_err(|err| FragmentError::from_parse(text, err))
}

/// Parse a class member: field, method, constructor, initializer or nested type.
pub fn parse_member_fragment(text: &str) -> Result<SyntaxTree, FragmentError> {
    parse_entry(text, Entry::Member).map_err(|err| FragmentError::from_parse(text, err))
}

#[cfg(test)]
mod tests {
    use jrewrite_core::TextSize;
    use pretty_assertions::assert_eq;

    use super::*;

    fn dump(text: &str) -> String {
        let tree = parse(text).unwrap();
        debug_dump(&tree, tree.root())
    }

    fn span_text(tree: &SyntaxTree, id: NodeId) -> &str {
        tree.node_text(id).unwrap()
    }

    #[test]
    fn parses_class_with_field_and_method() {
        let text = "package p;\n\nimport java.util.List;\n\npublic class A {\n    int x = 1;\n\n    void m(String s) {\n        return;\n    }\n}\n";
        let expected = r#"CompilationUnit
  PackageDecl
    Name "p"
  ImportList
    ImportDecl
      FieldAccess
        FieldAccess
          Name "java"
          Name "util"
        Name "List"
  TypeDeclList
    ClassDecl "class"
      ModifierList
        Modifier "public"
      Name "A"
      TypeParameterList
      -
      TypeList "implements"
      MemberList
        Variable
          ModifierList
          PrimitiveType "int"
          Name "x"
          Literal "1"
        MethodDecl
          ModifierList
          TypeParameterList
          PrimitiveType "void"
          Name "m"
          ParameterList
            Variable
              ModifierList
              Name "String"
              Name "s"
              -
          TypeList "throws"
          Block
            Return
              -
          -
"#;
        assert_eq!(dump(text), expected);
    }

    #[test]
    fn spans_cover_first_to_last_token() {
        let text = "class A {\n    // lead\n    int x = 1; // trail\n}\n";
        let tree = parse(text).unwrap();
        let types = tree.child(tree.root(), 2).unwrap();
        let class = tree.items(types)[0];
        let body = tree.child(class, 5).unwrap();
        let field = tree.items(body)[0];

        assert_eq!(span_text(&tree, class), "class A {\n    // lead\n    int x = 1; // trail\n}");
        assert_eq!(span_text(&tree, field), "int x = 1;");
        assert_eq!(span_text(&tree, body).chars().next(), Some('{'));
        assert_eq!(tree.span(tree.root()).unwrap().len(), TextSize::from(text.len() as u32));
    }

    #[test]
    fn empty_lists_are_anchored() {
        let tree = parse("class A {}").unwrap();
        let types = tree.child(tree.root(), 2).unwrap();
        let class = tree.items(types)[0];
        let modifiers = tree.child(class, 0).unwrap();
        let span = tree.span(modifiers).unwrap();
        assert!(span.is_empty());
        assert_eq!(u32::from(span.start()), 0);

        let imports = tree.child(tree.root(), 1).unwrap();
        assert_eq!(u32::from(tree.span(imports).unwrap().start()), 0);
    }

    #[test]
    fn local_variable_includes_terminator() {
        let tree = parse_block_fragment("{ final String s = \"a\"; s.length(); }").unwrap();
        let stmts = tree.items(tree.root());
        assert_eq!(tree.kind(stmts[0]), NodeKind::Variable);
        assert_eq!(span_text(&tree, stmts[0]), "final String s = \"a\";");
        assert_eq!(tree.kind(stmts[1]), NodeKind::ExpressionStatement);
    }

    #[test]
    fn shift_operators_are_assembled_from_adjacent_tokens() {
        let tree = parse_expression_fragment("a >>> 2 >= b >> 1").unwrap();
        let expected = r#"Binary ">="
  Binary ">>>"
    Name "a"
    Literal "2"
  Binary ">>"
    Name "b"
    Literal "1"
"#;
        assert_eq!(debug_dump(&tree, tree.root()), expected);
    }

    #[test]
    fn generic_types_close_with_separate_tokens() {
        let tree = parse_statement_fragment("Map<String, List<String>> m = null;").unwrap();
        assert_eq!(tree.kind(tree.root()), NodeKind::Variable);
        let ty = tree.child(tree.root(), 1).unwrap();
        assert_eq!(span_text(&tree, ty), "Map<String, List<String>>");
    }

    #[test]
    fn precedence_and_casts() {
        let tree = parse_expression_fragment("(int) x + y * 2 == 0 ? a : b").unwrap();
        let expected = r#"Conditional
  Binary "=="
    Binary "+"
      Cast
        PrimitiveType "int"
        Name "x"
      Binary "*"
        Name "y"
        Literal "2"
    Literal "0"
  Name "a"
  Name "b"
"#;
        assert_eq!(debug_dump(&tree, tree.root()), expected);
    }

    #[test]
    fn statements_parse_into_slots() {
        let text = "{ for (int i = 0; i < n; i++) { } for (String s : list) ; try { f(); } catch (Exception e) { } finally { } switch (k) { case 1: break; default: } }";
        let tree = parse_block_fragment(text).unwrap();
        let kinds: Vec<_> = tree.items(tree.root()).into_iter().map(|s| tree.kind(s)).collect();
        assert_eq!(kinds, vec![NodeKind::For, NodeKind::ForEach, NodeKind::Try, NodeKind::Switch]);
    }

    #[test]
    fn enum_body_splits_constants_and_members() {
        let tree = parse("enum E { A, B(1); int f; }").unwrap();
        let class = tree.items(tree.child(tree.root(), 2).unwrap())[0];
        let body = tree.child(class, 5).unwrap();
        assert_eq!(tree.kind(body), NodeKind::EnumBody);
        let constants = tree.child(body, 0).unwrap();
        let members = tree.child(body, 1).unwrap();
        assert_eq!(tree.items(constants).len(), 2);
        assert_eq!(tree.items(members).len(), 1);
    }

    #[test]
    fn unsupported_constructs_fail() {
        for text in [
            "class A { int a, b; }",
            "class A { void m() { Runnable r = () -> {}; } }",
            "class A { void m() { try (R r = open()) { } } }",
            "class A { void m() { try { } catch (A | B e) { } } }",
            "class A { void m() { int[][] x = new int[1][2]; } }",
        ] {
            assert!(parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn syntax_errors_carry_a_range() {
        let err = parse("class A { void m() { foo() } }").unwrap_err();
        assert_eq!(err.message, "expected `;` after expression");
        assert_eq!(&"class A { void m() { foo() } }"[err.range], "}");
    }

    #[test]
    fn fragment_errors_name_the_fragment() {
        let err = parse_statement_fragment("int x = ;").unwrap_err();
        assert_eq!(err.fragment, "int x = ;");
        assert_eq!(err.position, 8);
    }

    #[test]
    fn member_fragment_parses_method() {
        let tree = parse_member_fragment("public void m() {\n}").unwrap();
        assert_eq!(tree.kind(tree.root()), NodeKind::MethodDecl);
        assert_eq!(tree.text(tree.child(tree.root(), 3).unwrap()), Some("m"));
    }
}
