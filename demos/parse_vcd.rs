// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use clap::Parser;
use std::fs::File;

use vcd_parser::parse_vcd;

#[derive(Parser)]
struct Cli {
    /// The path to the file to read
    path: std::path::PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    use std::time::Instant;

    let now = Instant::now();
    let file = File::open(&args.path)?;
    let name = args.path.display().to_string();
    match parse_vcd(file) {
        Ok(document) => {
            let elapsed = now.elapsed();
            println!("Parsed VCD file {name} : {elapsed:.2?}");
            for diagnostic in document.diagnostics() {
                println!("{}", diagnostic.render(Some(&name)));
            }
        }
        Err(diagnostics) => eprintln!("{}", diagnostics.render(Some(&name))),
    }

    Ok(())
}
