use bug::ast::Module;

/// Assert that source parses and return the module
pub fn assert_parses(source: &str) -> Module {
    bug::parser::parse_module(source)
        .unwrap_or_else(|e| panic!("Expected source to parse: {}\n{}", e, source))
}

/// Assert that parsing fails
pub fn assert_parse_fails(source: &str) {
    assert!(
        bug::parser::parse_module(source).is_err(),
        "Expected source to fail parsing:\n{}",
        source
    );
}

/// Translate source that must be free of lexical errors
pub fn assert_compiles_clean(source: &str) -> String {
    let compiled = bug::compile(source)
        .unwrap_or_else(|e| panic!("Expected source to compile: {}\n{}", e, source));
    assert!(
        compiled.is_clean(),
        "Unexpected lexical errors: {:?}",
        compiled.lex_errors
    );
    compiled.code
}

/// Every opening bracket in generated C is closed, in order. String
/// literals are skipped.
pub fn assert_balanced(code: &str) {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for ch in code.chars() {
        if in_string {
            match ch {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => in_string = false,
                _ => escaped = false,
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' | '[' | '{' => stack.push(ch),
            ')' | ']' | '}' => {
                let open = stack.pop();
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                assert_eq!(open, Some(expected), "Unbalanced '{}' in:\n{}", ch, code);
            }
            _ => {}
        }
    }
    assert!(!in_string, "Unterminated string in:\n{}", code);
    assert!(stack.is_empty(), "Unclosed {:?} in:\n{}", stack, code);
}
