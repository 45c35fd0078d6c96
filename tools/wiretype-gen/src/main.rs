// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::env;
use std::path::PathBuf;
use std::process;

use wiretype_gen::Generator;

fn main() {
    // Initialize tracing for diagnostics
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            if let Err(e) = run_generate(&args[2..]) {
                eprintln!("[ERROR] {:#}", e);
                process::exit(1);
            }
        }
        "--help" | "-h" | "help" => {
            print_help();
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_help();
            process::exit(1);
        }
    }
}

fn run_generate(args: &[String]) -> anyhow::Result<()> {
    let mut schema: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from("generated");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => {
                out_dir = iter
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow::anyhow!("--out requires a directory argument"))?;
            }
            other => {
                if schema.replace(PathBuf::from(other)).is_some() {
                    anyhow::bail!("unexpected extra argument: {}", other);
                }
            }
        }
    }

    let schema = schema.ok_or_else(|| anyhow::anyhow!("missing schema path (see `wiretype-gen help`)"))?;

    let mut generator = Generator::new(&schema, out_dir)?;
    let report = generator.generate()?;

    report.summary();

    Ok(())
}

fn print_help() {
    println!("wiretype-gen v0.4");
    println!();
    println!("USAGE:");
    println!("    wiretype-gen <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    generate <schema> [--out <dir>]  Generate dispatch + view artifacts");
    println!("                                     from a YAML/JSON schema (default");
    println!("                                     output directory: ./generated)");
    println!("    help                             Print this help message");
    println!();
    println!("EXAMPLES:");
    println!("    wiretype-gen generate schemas/optimizer.yaml --out src/generated");
    println!();
}
