//! Bug CLI - Command line interface for the Bug to C translator

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, ValueEnum};

use bug_ast::{LineIndex, Span, SyntaxTree};
use bug_codegen::{generate_with, CodegenOptions};
use bug_lexer::{tokenize, LexError};
use bug_parser::parse;

#[derive(Parser)]
#[command(name = "bugc")]
#[command(about = "Translate Bug source to C", long_about = None)]
struct Cli {
    /// Input file
    file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Artifact to produce
    #[arg(long, value_enum, default_value_t = Emit::C)]
    emit: Emit,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Runtime header included after <stdio.h>
    #[arg(long, default_value = "bug.h")]
    runtime_header: String,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Print phase summaries to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Generated C source
    C,
    /// Token listing
    Tokens,
    /// Syntax tree as JSON
    Ast,
    /// Indented outline of the syntax tree
    Tree,
}

const EXIT_OK: i32 = 0;
const EXIT_SOURCE_ERROR: i32 = 1;
const EXIT_INTERNAL_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let source = match fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.file.display(), e);
            return EXIT_SOURCE_ERROR;
        }
    };

    if cli.emit == Emit::Tokens {
        return cmd_tokens(cli, &source);
    }
    cmd_translate(cli, &source)
}

fn cmd_translate(cli: &Cli, source: &str) -> i32 {
    let parsed = match parse(source) {
        Ok(p) => p,
        Err(e) => {
            // Lexical errors often explain the syntax error that follows
            report_lex_errors(source, &cli.file, &tokenize(source).errors);
            report(source, &cli.file, &e.to_string(), e.span());
            return EXIT_SOURCE_ERROR;
        }
    };
    report_lex_errors(source, &cli.file, &parsed.lex_errors);

    if cli.verbose {
        eprintln!(
            "{}: {} lines, {} tokens, {} declarations",
            cli.file.display(),
            LineIndex::new(source).line_count(),
            parsed.token_count,
            parsed.module.declarations.len()
        );
    }

    let text = match cli.emit {
        Emit::Ast => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&parsed.module)
            } else {
                serde_json::to_string(&parsed.module)
            };
            match json {
                Ok(json) => json + "\n",
                Err(e) => {
                    eprintln!("Error serializing syntax tree: {}", e);
                    return EXIT_INTERNAL_ERROR;
                }
            }
        }
        Emit::Tree => {
            let tree = SyntaxTree::from_module(&parsed.module);
            if cli.verbose {
                eprintln!("{}: {} tree nodes", cli.file.display(), tree.len());
            }
            tree.outline()
        }
        Emit::C => {
            let options = CodegenOptions {
                runtime_header: cli.runtime_header.clone(),
                indent_width: cli.indent,
            };
            match generate_with(&parsed.module, &options) {
                Ok(c) => c,
                Err(e) => {
                    report(source, &cli.file, &e.to_string(), e.span());
                    return EXIT_INTERNAL_ERROR;
                }
            }
        }
        Emit::Tokens => return cmd_tokens(cli, source),
    };

    if let Err(code) = write_output(cli, &text) {
        return code;
    }

    if parsed.lex_errors.is_empty() {
        EXIT_OK
    } else {
        EXIT_SOURCE_ERROR
    }
}

fn cmd_tokens(cli: &Cli, source: &str) -> i32 {
    let lexed = tokenize(source);
    report_lex_errors(source, &cli.file, &lexed.errors);

    let mut text = String::new();
    for token in &lexed.tokens {
        text.push_str(&format!(
            "{}\t{:?}\t{}\n",
            token.pos,
            token.kind,
            token.text(source)
        ));
    }

    if cli.verbose {
        eprintln!(
            "{}: {} tokens, {} lexical errors",
            cli.file.display(),
            lexed.tokens.len(),
            lexed.errors.len()
        );
    }

    if let Err(code) = write_output(cli, &text) {
        return code;
    }

    if lexed.errors.is_empty() {
        EXIT_OK
    } else {
        EXIT_SOURCE_ERROR
    }
}

fn write_output(cli: &Cli, text: &str) -> Result<(), i32> {
    match &cli.output {
        Some(path) => {
            fs::write(path, text).map_err(|e| {
                eprintln!("Error writing {}: {}", path.display(), e);
                EXIT_SOURCE_ERROR
            })?;
            if cli.verbose {
                eprintln!("Wrote {} ({} bytes)", path.display(), text.len());
            }
        }
        None => {
            print!("{}", text);
            if cli.verbose {
                eprintln!("Wrote stdout ({} bytes)", text.len());
            }
        }
    }
    Ok(())
}

fn report_lex_errors(source: &str, file: &Path, errors: &[LexError]) {
    for error in errors {
        report(source, file, &error.to_string(), error.span());
    }
}

fn report(source: &str, file: &Path, message: &str, span: Span) {
    let name = file.to_string_lossy().to_string();
    let range = char_range(source, span);
    let printed = Report::build(ReportKind::Error, name.clone(), range.start)
        .with_message(message)
        .with_label(
            Label::new((name.clone(), range))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source)));

    if printed.is_err() {
        eprintln!("{}: {}", file.display(), message);
    }
}

/// ariadne counts characters, spans count bytes
fn char_range(source: &str, span: Span) -> Range<usize> {
    let to_chars = |offset: usize| {
        let offset = offset.min(source.len());
        source
            .char_indices()
            .take_while(|(i, _)| *i < offset)
            .count()
    };
    to_chars(span.start)..to_chars(span.end)
}
