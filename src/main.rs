use std::{env, fs::read_to_string, path::Path, process::ExitCode, time::Instant};

use zeus::{
    ast::ast::{FieldName, Node},
    errors::errors::Diagnostics,
    lexer::{lexer::tokenize, tokens::TokenStream},
    parser::parser::parse,
    render_error,
};

struct Options {
    file_path: String,
    dump_tokens: bool,
    dump_tree: bool,
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut file_path = None;
    let mut dump_tokens = false;
    let mut dump_tree = false;

    for arg in args {
        match arg.as_str() {
            "--tokens" => dump_tokens = true,
            "--tree" => dump_tree = true,
            flag if flag.starts_with("--") => return None,
            path if file_path.is_none() => file_path = Some(path.to_string()),
            _ => return None,
        }
    }

    Some(Options {
        file_path: file_path?,
        dump_tokens,
        dump_tree,
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(options) = parse_args(&args) else {
        eprintln!("usage: zeus <file> [--tokens] [--tree]");
        return ExitCode::FAILURE;
    };

    let file_name = Path::new(&options.file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.file_path.clone());

    let file_contents = match read_to_string(&options.file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", options.file_path, error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let (tokens, lex_errors) = tokenize(&file_contents);

    println!("Tokenized in {:?}", start.elapsed());

    if options.dump_tokens {
        dump_tokens(&tokens);
    }

    let parse_start = Instant::now();
    let (source_file, syntax_errors) = parse(&tokens);

    println!("Parsed in {:?}", parse_start.elapsed());

    if options.dump_tree {
        print_tree(&source_file, None, 0);
    }

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(lex_errors);
    diagnostics.extend(syntax_errors);

    if diagnostics.is_empty() {
        println!("Total time: {:?}", start.elapsed());
        return ExitCode::SUCCESS;
    }

    let count = diagnostics.len();
    for error in diagnostics.into_sorted() {
        print!("{}", render_error(&error, &file_contents, &file_name));
    }
    println!("{} error(s) in {}", count, file_name);

    ExitCode::FAILURE
}

fn dump_tokens(stream: &TokenStream) {
    for token in &stream.tokens {
        println!("{}", token.debug());
    }

    for trivia in stream.comments() {
        println!(
            "{}:{} {:?} {:?}",
            trivia.span.start.line, trivia.span.start.column, trivia.kind, trivia.value
        );
    }
}

/// One node per line, indented by depth, with field labels and start positions.
fn print_tree(node: &dyn Node, field: Option<FieldName>, depth: usize) {
    let label = field.map(|f| format!("{}: ", f)).unwrap_or_default();
    let text = node.text().map(|t| format!(" {}", t)).unwrap_or_default();
    let start = node.span().start;

    println!(
        "{}{}{}{} [{}:{}]",
        "  ".repeat(depth),
        label,
        node.kind(),
        text,
        start.line,
        start.column
    );

    for (field, child) in node.children() {
        print_tree(child, field, depth + 1);
    }
}
