//! End-to-end tests: parse, set up the printer, edit the tree, print

use std::collections::BTreeSet;

use verbatim_core::ast::{Ast, Modifier, NodeId, Property, Value};
use verbatim_core::config::{LineEnding, PrinterConfig};
use verbatim_core::{ErrorKind, parse};
use verbatim_printer::{LexicalPreservingPrinter, LineIndex, TextElement};

const COMMENTED: &str =
    "class /*a comment*/ A {\t\t\n int f;\n\n\n         void foo(int p  ) { return  'z'  \t; }}";

struct Fixture {
    ast: Ast,
    root: NodeId,
    printer: LexicalPreservingPrinter,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let parsed = parse(source).unwrap();
        let mut ast = parsed.ast;
        let printer = LexicalPreservingPrinter::setup(&mut ast, parsed.root, source).unwrap();
        Self {
            ast,
            root: parsed.root,
            printer,
        }
    }

    fn with_config(source: &str, config: &PrinterConfig) -> Self {
        let parsed = parse(source).unwrap();
        let mut ast = parsed.ast;
        let printer =
            LexicalPreservingPrinter::setup_with_config(&mut ast, parsed.root, source, config)
                .unwrap();
        Self {
            ast,
            root: parsed.root,
            printer,
        }
    }

    fn class(&self, name: &str) -> NodeId {
        self.ast.class_by_name(self.root, name).unwrap()
    }

    fn method(&self, class: &str, name: &str) -> NodeId {
        self.ast.methods_by_name(self.class(class), name)[0]
    }

    fn print(&self, node: NodeId) -> String {
        self.printer.print(&self.ast, node)
    }

    fn body(&self, method: NodeId) -> NodeId {
        self.ast.node(method, Property::Body).unwrap()
    }
}

fn sum_statement(ast: &mut Ast) -> NodeId {
    let left = ast.new_integer("10");
    let right = ast.new_integer("2");
    let sum = ast.new_binary(left, "+", right).unwrap();
    ast.new_expression_stmt(sum).unwrap()
}

#[test]
fn test_node_text_of_simplest_class() {
    let f = Fixture::new("class A {}");
    let class = f.class("A");
    let name = f.ast.node(class, Property::Name).unwrap();

    let unit = f.printer.text_for(f.root).unwrap();
    assert_eq!(unit.elements(), &[TextElement::Child(class)]);

    let text = f.printer.text_for(class).unwrap();
    assert_eq!(text.len(), 3);
    assert_eq!(text.elements()[0], TextElement::Literal("class ".to_string()));
    assert_eq!(text.elements()[1], TextElement::Child(name));
    assert_eq!(text.elements()[2], TextElement::Literal(" {}".to_string()));

    let text = f.printer.text_for(name).unwrap();
    assert_eq!(text.elements(), &[TextElement::Literal("A".to_string())]);
}

#[test]
fn test_unchanged_round_trip() {
    let f = Fixture::new("class A {}");
    assert_eq!(f.print(f.root), "class A {}");
    assert_eq!(f.print(f.class("A")), "class A {}");

    let f = Fixture::new(COMMENTED);
    assert_eq!(f.print(f.root), COMMENTED);
    assert_eq!(f.print(f.class("A")), COMMENTED);
    assert_eq!(
        f.print(f.method("A", "foo")),
        "void foo(int p  ) { return  'z'  \t; }"
    );
}

#[test]
fn test_every_registered_node_round_trips() {
    let source = "// leading\npublic class A {\r\n  private static int a, b = (1 + 2) * 3;\n\n  /* doc */\n  final void foo(final int x, char y) {\n\treturn x - 'y';\n  }\n}\n\nclass B { }\n";
    let f = Fixture::new(source);
    let index = LineIndex::new(source);

    assert_eq!(f.print(f.root), source);
    for node in f.ast.descendants(f.root) {
        assert!(f.printer.is_registered(node), "{}", f.ast.label(node));
        let span = index.span(f.ast.range(node).unwrap()).unwrap();
        assert_eq!(f.print(node), &source[span], "{}", f.ast.label(node));
    }
}

#[test]
fn test_printing_is_idempotent_and_snapshots_do_not_alias() {
    let mut f = Fixture::new(COMMENTED);
    let class = f.class("A");
    let first = f.print(f.root);
    assert_eq!(f.print(f.root), first);

    let mut snapshot = f.printer.text_for(class).unwrap();
    snapshot.prepend_literal("public ");
    assert_eq!(f.print(f.root), first);

    f.ast.add_field(class, "int", "g").unwrap();
    assert_ne!(f.printer.text_for(class).unwrap(), snapshot);
}

#[test]
fn test_add_field_to_empty_class() {
    let mut f = Fixture::new("class A {}");
    let class = f.class("A");
    f.ast.add_field(class, "int", "myField").unwrap();
    assert_eq!(f.print(class), "class A {\n    int myField;\n}");
}

#[test]
fn test_append_field_leaves_no_blank_line() {
    let mut f = Fixture::new("class A {\n    int a;\n}");
    let class = f.class("A");
    f.ast.add_field(class, "int", "b").unwrap();
    assert_eq!(f.print(class), "class A {\n    int a;\n    int b;\n}");

    f.ast.add_field(class, "int", "c").unwrap();
    assert_eq!(f.print(class), "class A {\n    int a;\n    int b;\n    int c;\n}");
}

#[test]
fn test_first_member_before_existing_line_break() {
    let mut f = Fixture::new("class A {\n}");
    let class = f.class("A");
    f.ast.add_field(class, "int", "a").unwrap();
    assert_eq!(f.print(class), "class A {\n    int a;\n}");
}

#[test]
fn test_remove_first_member_keeps_whitespace() {
    let mut f = Fixture::new(COMMENTED);
    let class = f.class("A");
    f.ast.remove(class, Property::Members, 0).unwrap();
    assert_eq!(
        f.print(class),
        "class /*a comment*/ A {\t\t\n \n\n\n         void foo(int p  ) { return  'z'  \t; }}"
    );
}

#[test]
fn test_add_parameter_to_method_without_parameters() {
    let mut f = Fixture::new("class A { void foo() {} }");
    let foo = f.method("A", "foo");
    f.ast.add_parameter(foo, "float", "p1").unwrap();
    assert_eq!(f.print(foo), "void foo(float p1) {}");
}

#[test]
fn test_add_parameter_after_existing_one() {
    let mut f = Fixture::new("class A { void foo(char p1) {} }");
    let foo = f.method("A", "foo");
    f.ast.add_parameter(foo, "float", "p2").unwrap();
    assert_eq!(f.print(foo), "void foo(char p1, float p2) {}");
}

#[test]
fn test_insert_parameter_before_existing_one() {
    let mut f = Fixture::new("class A { void foo(char p1) {} }");
    let foo = f.method("A", "foo");
    let ty = f.ast.new_type("int").unwrap();
    let name = f.ast.new_simple_name("p0");
    let param = f.ast.new_parameter(BTreeSet::new(), ty, name).unwrap();
    f.ast.insert(foo, Property::Parameters, 0, param).unwrap();
    assert_eq!(f.print(foo), "void foo(int p0, char p1) {}");
}

#[test]
fn test_remove_only_parameter() {
    let mut f = Fixture::new("class A { void foo(float p1) {} }");
    let foo = f.method("A", "foo");
    f.ast.remove(foo, Property::Parameters, 0).unwrap();
    assert_eq!(f.print(foo), "void foo() {}");
}

#[test]
fn test_remove_first_of_two_parameters() {
    let mut f = Fixture::new("class A { void foo(char p1, int p2) {} }");
    let foo = f.method("A", "foo");
    f.ast.remove(foo, Property::Parameters, 0).unwrap();
    assert_eq!(f.print(foo), "void foo(int p2) {}");
}

#[test]
fn test_remove_second_of_two_parameters() {
    let mut f = Fixture::new("class A { void foo(char p1, int p2) {} }");
    let foo = f.method("A", "foo");
    f.ast.remove(foo, Property::Parameters, 1).unwrap();
    assert_eq!(f.print(foo), "void foo(char p1) {}");
}

#[test]
fn test_remove_parameter_followed_by_comment() {
    let mut f = Fixture::new("class A { void foo(int a /* first */, int b) {} }");
    let foo = f.method("A", "foo");
    f.ast.remove(foo, Property::Parameters, 0).unwrap();
    assert_eq!(f.print(foo), "void foo(int b) {}");
}

#[test]
fn test_replace_parameter_in_place() {
    let mut f = Fixture::new("class A { void foo(char p1, int p2) {} }");
    let foo = f.method("A", "foo");
    let ty = f.ast.new_type("float").unwrap();
    let name = f.ast.new_simple_name("q");
    let param = f.ast.new_parameter(BTreeSet::new(), ty, name).unwrap();
    f.ast.replace_at(foo, Property::Parameters, 0, param).unwrap();
    assert_eq!(f.print(foo), "void foo(float q, int p2) {}");
}

#[test]
fn test_add_statement_to_empty_body() {
    let mut f = Fixture::new("class A { void foo(char p1, int p2) {} }");
    let foo = f.method("A", "foo");
    let stmt = sum_statement(&mut f.ast);
    f.ast.add_statement(foo, stmt).unwrap();
    assert_eq!(f.print(foo), "void foo(char p1, int p2) {\n    10 + 2;}");
}

#[test]
fn test_statements_on_their_own_lines() {
    let source = "class A {\n  void foo() {\n    return;\n  }\n}";
    let mut f = Fixture::new(source);
    let body = f.body(f.method("A", "foo"));

    let first = sum_statement(&mut f.ast);
    f.ast.insert(body, Property::Statements, 0, first).unwrap();
    assert_eq!(f.print(body), "{\n    10 + 2;\n    return;\n  }");

    let value = f.ast.new_integer("1");
    let last = f.ast.new_expression_stmt(value).unwrap();
    f.ast.push(body, Property::Statements, last).unwrap();
    assert_eq!(f.print(body), "{\n    10 + 2;\n    return;\n    1;\n  }");
}

#[test]
fn test_configured_indent_and_line_ending() {
    let config = PrinterConfig {
        indent: "\t".to_string(),
        line_ending: LineEnding::Auto,
    };
    let mut f = Fixture::with_config("class A {\r\n  void foo() {}\r\n}", &config);
    let foo = f.method("A", "foo");
    let stmt = sum_statement(&mut f.ast);
    f.ast.add_statement(foo, stmt).unwrap();
    assert_eq!(f.print(foo), "void foo() {\r\n\t10 + 2;}");
}

#[test]
fn test_add_class_to_compilation_unit() {
    let mut f = Fixture::new("class A {}");
    let name = f.ast.new_simple_name("B");
    let class = f.ast.new_class(BTreeSet::new(), name, Vec::new()).unwrap();
    f.ast.push(f.root, Property::Types, class).unwrap();
    assert_eq!(f.print(f.root), "class A {}\n\nclass B {}");
}

#[test]
fn test_edits_inside_a_fresh_method() {
    let mut f = Fixture::new("class A {}");
    let class = f.class("A");
    let ret = f.ast.new_void_type();
    let name = f.ast.new_simple_name("run");
    let body = f.ast.new_block(Vec::new()).unwrap();
    let method = f
        .ast
        .new_method(BTreeSet::new(), ret, name, Vec::new(), Some(body))
        .unwrap();
    f.ast.push(class, Property::Members, method).unwrap();
    assert!(f.printer.is_registered(method));

    f.ast.add_parameter(method, "int", "x").unwrap();
    f.ast
        .set_modifiers(method, BTreeSet::from([Modifier::Public]))
        .unwrap();
    assert_eq!(f.print(class), "class A {\n    public void run(int x) {}\n}");
}

#[test]
fn test_rename_swaps_name_reference() {
    let mut f = Fixture::new("class /* keep */ A {}");
    let class = f.class("A");
    f.ast.rename(class, "B").unwrap();
    assert_eq!(f.print(f.root), "class /* keep */ B {}");
}

#[test]
fn test_identifier_and_operator_tokens() {
    let mut f = Fixture::new("class A { int x = 1 +  2; }");
    let class = f.class("A");
    let field = f.ast.field_by_name(class, "x").unwrap();
    let var = f.ast.list(field, Property::Variables)[0];
    let name = f.ast.node(var, Property::Name).unwrap();
    let init = f.ast.node(var, Property::Initializer).unwrap();

    f.ast.set_identifier(name, "total").unwrap();
    f.ast.set(init, Property::Operator, "*".into()).unwrap();
    let int = f.ast.node(field, Property::ElementType).unwrap();
    f.ast.set(int, Property::Keyword, "long".into()).unwrap();
    assert_eq!(f.print(class), "class A { long total = 1 *  2; }");
}

#[test]
fn test_operator_inside_comment_is_not_rewritten() {
    let mut f = Fixture::new("class A { int x = 1 /* a-b */ - 2; }");
    let class = f.class("A");
    let field = f.ast.field_by_name(class, "x").unwrap();
    let var = f.ast.list(field, Property::Variables)[0];
    let init = f.ast.node(var, Property::Initializer).unwrap();

    f.ast.set(init, Property::Operator, "+".into()).unwrap();
    assert_eq!(f.print(class), "class A { int x = 1 /* a-b */ + 2; }");
}

#[test]
fn test_modifier_inside_comment_is_kept() {
    let mut f = Fixture::new("class A { public /* static */ static int x; }");
    let class = f.class("A");
    let x = f.ast.field_by_name(class, "x").unwrap();
    f.ast
        .set_modifiers(x, BTreeSet::from([Modifier::Public]))
        .unwrap();
    assert_eq!(f.print(class), "class A { public /* static */ int x; }");
}

#[test]
fn test_modifier_changes() {
    let mut f = Fixture::new("class A {\n  static int x;\n  public static int y;\n}");
    let class = f.class("A");
    let x = f.ast.field_by_name(class, "x").unwrap();
    let y = f.ast.field_by_name(class, "y").unwrap();

    f.ast
        .set_modifiers(
            x,
            BTreeSet::from([Modifier::Public, Modifier::Static, Modifier::Final]),
        )
        .unwrap();
    f.ast
        .set_modifiers(y, BTreeSet::from([Modifier::Public]))
        .unwrap();
    assert_eq!(
        f.print(class),
        "class A {\n  public final static int x;\n  public int y;\n}"
    );
}

#[test]
fn test_initializer_connective() {
    let mut f = Fixture::new("class A { int x; int y = 1 + 2; }");
    let class = f.class("A");
    let x = f.ast.list(f.ast.field_by_name(class, "x").unwrap(), Property::Variables)[0];
    let y = f.ast.list(f.ast.field_by_name(class, "y").unwrap(), Property::Variables)[0];

    let three = f.ast.new_integer("3");
    f.ast.set_initializer(x, Some(three)).unwrap();
    f.ast.set_initializer(y, None).unwrap();
    assert_eq!(f.print(class), "class A { int x = 3; int y; }");
}

#[test]
fn test_return_expression_connective() {
    let mut f = Fixture::new("class A { int f() { return 'z'; } void g() { return; } }");
    let f_body = f.body(f.method("A", "f"));
    let g_body = f.body(f.method("A", "g"));
    let f_ret = f.ast.list(f_body, Property::Statements)[0];
    let g_ret = f.ast.list(g_body, Property::Statements)[0];

    let expr = f.ast.node(f_ret, Property::Expression).unwrap();
    f.ast.remove_node(expr).unwrap();
    let one = f.ast.new_integer("1");
    f.ast
        .set(g_ret, Property::Expression, Value::Optional(Some(one)))
        .unwrap();
    assert_eq!(
        f.print(f.root),
        "class A { int f() { return; } void g() { return 1; } }"
    );
}

#[test]
fn test_unsupported_edit_is_reported() {
    let mut f = Fixture::new("class A { void foo() {} }");
    let foo = f.method("A", "foo");
    let body = f.body(foo);
    let err = f.ast.remove_node(body).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedEdit);
    assert_eq!(f.ast.node(foo, Property::Body), None);
}

#[test]
fn test_edits_outside_registered_subtree_are_ignored() {
    let source = "class A { void foo() {} void bar() {} }";
    let parsed = parse(source).unwrap();
    let mut ast = parsed.ast;
    let class = ast.class_by_name(parsed.root, "A").unwrap();
    let foo = ast.methods_by_name(class, "foo")[0];
    let bar = ast.methods_by_name(class, "bar")[0];
    let printer = LexicalPreservingPrinter::setup(&mut ast, foo, source).unwrap();
    assert!(!printer.is_registered(bar));

    ast.add_parameter(bar, "int", "x").unwrap();
    ast.add_parameter(foo, "int", "y").unwrap();
    assert_eq!(printer.print(&ast, foo), "void foo(int y) {}");
    assert_eq!(printer.print(&ast, bar), "void bar(int x) {}");
}

#[test]
fn test_class_text_snapshot_after_edits() {
    let mut f = Fixture::new("class A {\n  int a;\n}");
    let class = f.class("A");
    f.ast.add_field(class, "char", "b").unwrap();
    let text = f.printer.text_for(class).unwrap();
    insta::assert_snapshot!(text.describe(&f.ast), @r#""class " [SimpleName#0] " {\n  " [FieldDeclaration#4] "\n    " [FieldDeclaration#10] "\n}""#);
    assert_eq!(f.print(class), "class A {\n  int a;\n    char b;\n}");
}

#[test]
fn test_editing_a_node_leaves_sibling_text_alone() {
    let mut f = Fixture::new("class A {\n  void foo(int a) { return a; }\n  void bar(int b) { return b; }\n}");
    let foo = f.method("A", "foo");
    let bar = f.method("A", "bar");
    assert!(f.printer.is_registered(bar));
    let before: Vec<_> = f
        .ast
        .descendants(bar)
        .into_iter()
        .map(|node| (node, f.printer.text_for(node)))
        .collect();

    f.ast.add_parameter(foo, "char", "c").unwrap();
    f.ast.remove(foo, Property::Parameters, 0).unwrap();
    f.ast.rename(foo, "baz").unwrap();
    let foo_param = f.ast.list(foo, Property::Parameters)[0];
    let foo_type = f.ast.node(foo_param, Property::ParamType).unwrap();
    f.ast.set(foo_type, Property::Keyword, "long".into()).unwrap();

    for (node, text) in &before {
        assert_eq!(&f.printer.text_for(*node), text, "{}", f.ast.label(*node));
    }
    assert_eq!(f.print(foo), "void baz(long c) { return a; }");
    assert_eq!(f.print(bar), "void bar(int b) { return b; }");
}

#[test]
fn test_rename_class() {
    let mut f = Fixture::new("public class A {\n    int a;\n}");
    let class = f.class("A");
    f.ast.rename(class, "B").unwrap();
    assert_eq!(f.print(f.root), "public class B {\n    int a;\n}");
}

#[test]
fn test_add_class_modifiers() {
    let mut f = Fixture::new("class A {}");
    let class = f.class("A");
    f.ast
        .set_modifiers(class, BTreeSet::from([Modifier::Public, Modifier::Final]))
        .unwrap();
    assert_eq!(f.print(class), "public final class A {}");
}

#[test]
fn test_remove_class_modifiers() {
    let mut f = Fixture::new("public final class A {}");
    let class = f.class("A");
    f.ast.set_modifiers(class, BTreeSet::new()).unwrap();
    assert_eq!(f.print(class), "class A {}");
}

#[test]
fn test_replace_class_modifier() {
    let mut f = Fixture::new("public class A {}");
    let class = f.class("A");
    f.ast
        .set_modifiers(class, BTreeSet::from([Modifier::Final]))
        .unwrap();
    assert_eq!(f.print(class), "final class A {}");
}

#[test]
fn test_add_class_members() {
    let mut f = Fixture::new("class A {\n    int a;\n}");
    let class = f.class("A");
    let ret = f.ast.new_void_type();
    let name = f.ast.new_simple_name("run");
    let body = f.ast.new_block(Vec::new()).unwrap();
    let method = f
        .ast
        .new_method(BTreeSet::new(), ret, name, Vec::new(), Some(body))
        .unwrap();
    f.ast.push(class, Property::Members, method).unwrap();
    f.ast.add_field(class, "char", "b").unwrap();
    assert_eq!(
        f.print(class),
        "class A {\n    int a;\n    void run() {}\n    char b;\n}"
    );
}

#[test]
fn test_remove_class_member() {
    let mut f = Fixture::new("class A {\n    int a;\n    void run() {}\n}");
    let class = f.class("A");
    let removed = f.ast.remove(class, Property::Members, 1).unwrap();
    assert_eq!(f.ast.parent(removed), None);
    assert_eq!(f.print(class), "class A {\n    int a;\n    \n}");
}

#[test]
fn test_replace_class_member() {
    let mut f = Fixture::new("class A {\n    int a; // first\n    void run() {}\n}");
    let class = f.class("A");
    let ty = f.ast.new_type("char").unwrap();
    let name = f.ast.new_simple_name("b");
    let var = f.ast.new_variable(name, None).unwrap();
    let field = f.ast.new_field(BTreeSet::new(), ty, vec![var]).unwrap();

    f.ast.replace_at(class, Property::Members, 0, field).unwrap();
    assert!(f.printer.is_registered(field));
    assert_eq!(
        f.print(class),
        "class A {\n    char b; // first\n    void run() {}\n}"
    );
}

#[test]
fn test_replaced_member_accepts_later_edits() {
    let mut f = Fixture::new("class A {\n    int a;\n}");
    let class = f.class("A");
    let ty = f.ast.new_type("int").unwrap();
    let name = f.ast.new_simple_name("b");
    let var = f.ast.new_variable(name, None).unwrap();
    let field = f.ast.new_field(BTreeSet::new(), ty, vec![var]).unwrap();
    f.ast.replace_at(class, Property::Members, 0, field).unwrap();

    f.ast
        .set_modifiers(field, BTreeSet::from([Modifier::Private]))
        .unwrap();
    let one = f.ast.new_integer("1");
    f.ast.set_initializer(var, Some(one)).unwrap();
    assert_eq!(f.print(class), "class A {\n    private int b = 1;\n}");
}

#[test]
fn test_cyclic_insert_is_rejected() {
    let mut f = Fixture::new("class A { void foo() {} }");
    let body = f.body(f.method("A", "foo"));
    let err = f.ast.insert(body, Property::Statements, 0, f.root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEdit);
    assert!(f.ast.list(body, Property::Statements).is_empty());
    assert_eq!(f.print(f.root), "class A { void foo() {} }");
}
