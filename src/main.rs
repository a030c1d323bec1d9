// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::Level;

use vcd_parser::{Document, Driver, ParseOptions, ScopeItem};

#[derive(Parser)]
#[command(version, about = "Parses a VCD file and summarizes its contents")]
struct Cli {
    /// The path to the file to read
    path: PathBuf,

    /// Stop at the first diagnostic of any kind
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Keep going when scopes are left open at `$enddefinitions`
    #[arg(long)]
    lenient: bool,

    /// Print the scope hierarchy
    #[arg(long)]
    print_scopes: bool,

    /// Print every value change
    #[arg(long)]
    print_changes: bool,

    /// Log parser progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = if args.strict {
        ParseOptions::strict()
    } else if args.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };

    let name = args.path.display().to_string();
    let now = Instant::now();
    let result = Driver::new(options).parse_file(&args.path);
    let elapsed = now.elapsed();

    let document = match result {
        Ok(document) => document,
        Err(diagnostics) => {
            eprintln!("{}", diagnostics.render(Some(&name)));
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in document.diagnostics() {
        eprintln!("{}", diagnostic.render(Some(&name)));
    }

    println!("Parsed VCD file {name} : {elapsed:.2?}");
    if let Some(timescale) = document.timescale() {
        println!("  timescale     : {timescale}");
    }
    // the unnamed root is not a declared scope
    println!("  scopes        : {}", document.header().scopes().len() - 1);
    println!("  variables     : {}", document.variables().len());
    println!("  value changes : {}", document.value_changes().len());
    println!("  diagnostics   : {}", document.diagnostics().len());

    if args.print_scopes {
        for item in &document.root_scope().items {
            print_item(&document, *item, 1);
        }
    }

    if args.print_changes {
        print_changes(&document);
    }

    ExitCode::SUCCESS
}

fn print_item(document: &Document, item: ScopeItem, depth: usize) {
    let indent = "  ".repeat(depth);
    match item {
        ScopeItem::Scope(idx) => {
            let scope = document.scope(idx);
            println!("{indent}{} {}", scope.kind.keyword(), scope.name);
            for child in &scope.items {
                print_item(document, *child, depth + 1);
            }
        }
        ScopeItem::Variable(idx) => {
            let var = document.variable(idx);
            let range = var.bit_range.map(|r| r.to_string()).unwrap_or_default();
            println!(
                "{indent}{} {}{range} ({} bit(s), code `{}`)",
                var.var_type.keyword(),
                var.reference_name,
                var.width,
                var.identifier_code
            );
        }
    }
}

fn print_changes(document: &Document) {
    let header = document.header();
    for change in document.value_changes() {
        let names: Vec<String> = document
            .variables_for_code(&change.identifier_code)
            .iter()
            .map(|idx| header.variable_path(*idx))
            .collect();
        println!("#{} {} = {}", change.timestamp, names.join(", "), change.value);
    }
}
