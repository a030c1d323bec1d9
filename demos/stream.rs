// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use clap::Parser;
use std::collections::HashMap;
use std::fs::File;

use vcd_parser::Driver;

/// Counts toggles per variable without holding the dump in memory.
#[derive(Parser)]
struct Cli {
    /// The path to the file to read
    path: std::path::PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Cli::parse();
    let name = args.path.display().to_string();
    let file = File::open(&args.path)?;

    let mut changes = match Driver::default().stream(file) {
        Ok(changes) => changes,
        Err(diagnostics) => {
            eprintln!("{}", diagnostics.render(Some(&name)));
            return Ok(());
        }
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut last_time = 0;
    for change in changes.by_ref() {
        match change {
            Ok(change) => {
                last_time = change.timestamp;
                *counts.entry(change.identifier_code).or_default() += 1;
            }
            Err(err) => {
                eprintln!("{}", err.render(Some(&name)));
                break;
            }
        }
    }

    let header = changes.header();
    let mut rows: Vec<(String, usize)> = header
        .variables()
        .iter()
        .enumerate()
        .map(|(idx, var)| {
            let count = counts.get(&var.identifier_code).copied().unwrap_or(0);
            (header.variable_path(vcd_parser::VarIdx(idx)), count)
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("last timestamp : #{last_time}");
    for (path, count) in rows {
        println!("{count:>10} {path}");
    }

    Ok(())
}
