//! Every sample program under demos/ must translate cleanly

mod common;

use common::assertions::assert_balanced;
use common::fixtures::discover_demos;
use std::fs;

#[test]
fn test_all_demos_compile() {
    let demos = discover_demos();

    assert!(
        !demos.is_empty(),
        "No .bug demos found! Check demos/ directory."
    );

    let mut failures = Vec::new();

    for demo_path in &demos {
        let source = fs::read_to_string(demo_path)
            .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", demo_path, e));

        match bug::compile(&source) {
            Ok(compiled) if compiled.is_clean() => {
                assert_balanced(&compiled.code);
                println!("✓ Compiled: {}", demo_path.display());
            }
            Ok(compiled) => {
                let err = format!("lexical errors: {:?}", compiled.lex_errors);
                eprintln!("✗ {}: {}", demo_path.display(), err);
                failures.push((demo_path.clone(), err));
            }
            Err(err) => {
                eprintln!("✗ Failed to compile: {}", demo_path.display());
                eprintln!("  Error: {}", err);
                failures.push((demo_path.clone(), err.to_string()));
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} out of {} demos failed to compile:\n{}",
            failures.len(),
            demos.len(),
            failures
                .iter()
                .map(|(path, err)| format!("  - {}: {}", path.display(), err))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

#[test]
fn test_every_function_is_emitted() {
    for demo_path in discover_demos() {
        let source = fs::read_to_string(&demo_path).unwrap();
        let module = bug::parser::parse_module(&source).unwrap();
        let code = bug::compile(&source).unwrap().code;

        for func in module.functions() {
            assert!(
                code.contains(&format!(" {}(", func.name)),
                "{}: function '{}' missing from output",
                demo_path.display(),
                func.name
            );
        }
    }
}
