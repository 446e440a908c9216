//! End-to-end lowering tests: Bug source in, exact C text out

use bug_codegen::{generate, generate_with, CodegenOptions};
use bug_parser::parse_module;

const PRELUDE: &str = "#include <stdio.h>\n#include \"bug.h\"\n\n";

fn compile(source: &str) -> String {
    let module = parse_module(source).expect("source should parse");
    generate(&module).expect("codegen should succeed")
}

/// Generated text with the include lines stripped
fn body(source: &str) -> String {
    let c = compile(source);
    assert!(c.starts_with(PRELUDE), "missing prelude:\n{}", c);
    c[PRELUDE.len()..].to_string()
}

/// Lines of the single function's body, with the function's own indent removed
fn statements(source: &str) -> Vec<String> {
    let text = body(source);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.len() >= 2, "not a function:\n{}", text);
    lines[1..lines.len() - 1]
        .iter()
        .map(|l| l.strip_prefix("    ").unwrap_or(l).to_string())
        .collect()
}

#[test]
fn test_empty_module() {
    assert_eq!(compile(""), "#include <stdio.h>\n#include \"bug.h\"\n");
}

#[test]
fn test_empty_function() {
    assert_eq!(body("fn f() { }"), "void f() {\n}\n");
}

#[test]
fn test_sized_array_variable() {
    assert_eq!(
        body("let buf: [i32; 4] = [1, 2, 3, 4];"),
        "int buf[4] = {1, 2, 3, 4};\n"
    );
}

#[test]
fn test_struct_and_function() {
    let source = r#"
struct Point { x: i32, y: i32 }

fn add(a: i32, b: i32) -> i32 {
    return a + b;
}
"#;
    let expected = "\
typedef struct {
    int x;
    int y;
} Point;

int add(int a, int b) {
    return a + b;
}
";
    assert_eq!(body(source), expected);
}

#[test]
fn test_enum_declaration() {
    assert_eq!(
        body("enum Color { Red = 0, Green, Blue }"),
        "enum Color {\n    Red = 0,\n    Green,\n    Blue,\n};\n"
    );
}

#[test]
fn test_stray_semicolons_emit_nothing() {
    assert_eq!(body(";; let x: i32 = 1; ;"), "int x = 1;\n");
}

#[test]
fn test_parameter_and_field_types() {
    let source = "struct Buf { data: [char; 16], next: *Buf } \
                  fn fill(p: *i64, names: [string], n: f64) -> [i32] { return p; }";
    let expected = "\
typedef struct {
    char data[16];
    Buf* next;
} Buf;

int* fill(long long* p, char* names[], double n) {
    return p;
}
";
    assert_eq!(body(source), expected);
}

#[test]
fn test_match_statement_lowering() {
    let lines = statements("fn main() { match x { 1 => a, 2 => b, * => c }; }");
    assert_eq!(
        lines,
        vec!["if (x == 1) { a; } else if (x == 2) { b; } else { c; }"]
    );
}

#[test]
fn test_match_wildcard_written_first() {
    let lines = statements("fn main() { match x { * => c, 1 => a, 2 => b }; }");
    assert_eq!(
        lines,
        vec!["if (x == 1) { a; } else if (x == 2) { b; } else { c; }"]
    );
}

#[test]
fn test_match_without_wildcard() {
    let lines = statements("fn main() { match x { 1 => a, 2 => b }; }");
    assert_eq!(lines, vec!["if (x == 1) { a; } else if (x == 2) { b; }"]);
}

#[test]
fn test_match_wildcard_only() {
    let lines = statements("fn main() { match x { * => c }; }");
    assert_eq!(lines, vec!["{ c; }"]);
}

#[test]
fn test_nested_match_arm_is_a_statement() {
    let lines = statements("fn main() { match x { 1 => match y { 2 => a, * => b }, * => c }; }");
    assert_eq!(
        lines,
        vec!["if (x == 1) { if (y == 2) { a; } else { b; } } else { c; }"]
    );
}

#[test]
fn test_match_in_value_position() {
    let lines = statements(
        "fn main() { let y: i32 = match x { 1 => 10, 2 => 20, * => 0 }; \
         print(match x { 1 => a }); return match k { * => 5 }; }",
    );
    assert_eq!(
        lines,
        vec![
            "int y = ((x == 1) ? 10 : (x == 2) ? 20 : 0);",
            "print((a));",
            "return (5);",
        ]
    );
}

#[test]
fn test_match_as_operand() {
    let lines = statements("fn main() { z = 1 + match x { 1 => 2, * => 3 } * 4; }");
    assert_eq!(lines, vec!["z = 1 + ((x == 1) ? 2 : 3) * 4;"]);
}

#[test]
fn test_if_else_if_else_chain() {
    let source = "fn f(a: bool, b: bool) { if a { x = 1; } else if b { x = 2; } else { x = 3; } }";
    let expected = "\
void f(bool a, bool b) {
    if (a) {
        x = 1;
    } else if (b) {
        x = 2;
    } else {
        x = 3;
    }
}
";
    assert_eq!(body(source), expected);
}

#[test]
fn test_if_without_else() {
    let lines = statements("fn f() { if a { g(); } }");
    assert_eq!(lines, vec!["if (a) {", "    g();", "}"]);
}

#[test]
fn test_if_with_else_block() {
    let lines = statements("fn f() { if a { g(); } else { h(); } }");
    assert_eq!(lines, vec!["if (a) {", "    g();", "} else {", "    h();", "}"]);
}

#[test]
fn test_post_condition_loop() {
    let lines = statements("fn f() { let i: i32 = 0; loop { i = i + 1; } while i < 10; }");
    assert_eq!(
        lines,
        vec!["int i = 0;", "do {", "    i = i + 1;", "} while (i < 10);"]
    );
}

#[test]
fn test_nested_blocks_indent() {
    let lines = statements("fn f() { loop { if a { return; } } while true; }");
    assert_eq!(
        lines,
        vec![
            "do {",
            "    if (a) {",
            "        return;",
            "    }",
            "} while (true);",
        ]
    );
}

#[test]
fn test_precedence_survives_dropped_parentheses() {
    let lines = statements(
        "fn f() { a = 1 + 2 * 3; b = (1 + 2) * 3; c = !true && false; d = !(p && q); \
         e = 10 - (4 - 3); g = -(-x); }",
    );
    assert_eq!(
        lines,
        vec![
            "a = 1 + 2 * 3;",
            "b = (1 + 2) * 3;",
            "c = !true && false;",
            "d = !(p && q);",
            "e = 10 - (4 - 3);",
            "g = -(-x);",
        ]
    );
}

#[test]
fn test_postfix_and_calls() {
    let lines = statements("fn f() { print(p.x, buf[i + 1], grid[0][1], g()); }");
    assert_eq!(lines, vec!["print(p.x, buf[i + 1], grid[0][1], g());"]);
}

#[test]
fn test_struct_construction() {
    assert_eq!(
        body("let p: Point = new Point { x: 1, y: 2 };"),
        "Point p = { .x = 1, .y = 2 };\n"
    );
}

#[test]
fn test_literals() {
    let lines = statements(
        "fn f() { let s: string = 'say \"hi\"'; let t: string = \"plain\"; \
         let r: f64 = 2.5; let ok: bool = false; }",
    );
    assert_eq!(
        lines,
        vec![
            "char* s = \"say \\\"hi\\\"\";",
            "char* t = \"plain\";",
            "double r = 2.5;",
            "bool ok = false;",
        ]
    );
}

#[test]
fn test_trailing_backslash_stays_inside_string() {
    assert_eq!(
        body(r"let s: string = 'C:\';"),
        "char* s = \"C:\\\\\";\n"
    );
}

#[test]
fn test_empty_statement() {
    assert_eq!(statements("fn f() { ; }"), vec![";"]);
}

#[test]
fn test_options_header_and_indent() {
    let module = parse_module("fn f() { if a { g(); } }").unwrap();
    let options = CodegenOptions {
        runtime_header: "rt/bug_runtime.h".to_string(),
        indent_width: 2,
    };
    let c = generate_with(&module, &options).unwrap();
    assert_eq!(
        c,
        "#include <stdio.h>\n#include \"rt/bug_runtime.h\"\n\nvoid f() {\n  if (a) {\n    g();\n  }\n}\n"
    );
}

#[test]
fn test_output_is_deterministic() {
    let source = "enum E { A, B } fn f(x: E) -> i32 { return match x { A => 1, * => 2 }; }";
    assert_eq!(compile(source), compile(source));
}
