// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! cellsan CLI - sanitize cell HTML from files or stdin

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use cellsan::{extract_lines, ErrorContext, Policy, Result, Sanitizer};

/// Options shared by every command
struct Options {
    policy: Option<String>,
    report: bool,
    positional: Vec<String>,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cellsan=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::from(1);
    };

    let options = match parse_options(&args[1..]) {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(1);
        }
    };

    match command.as_str() {
        "sanitize" => run(sanitize_input(&options)),
        "lines" => run(print_lines(&options)),
        "url" => match options.positional.first() {
            Some(url) => check_url(&options, url),
            None => {
                eprintln!("Usage: cellsan url <URL>");
                ExitCode::from(1)
            }
        },
        "policy" => run(print_policy(&options)),
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("cellsan {}", cellsan::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"cellsan - Rich-text cell sanitizer

USAGE:
    cellsan <COMMAND> [OPTIONS]

COMMANDS:
    sanitize [FILE]   Sanitize HTML from FILE (or stdin) to stdout
    lines [FILE]      Sanitize, then print one extracted line per row
    url <URL>         Check a URL against the policy (exit 2 if unsafe)
    policy            Print the active policy as JSON
    help              Show this help message
    version           Show version information

OPTIONS:
    --policy <FILE>   Load the sanitization policy from a JSON file
    --report          Print a JSON neutralization report to stderr

EXAMPLES:
    cellsan sanitize cell.html
    echo '<b onclick="x()">hi</b>' | cellsan sanitize --report
    cellsan url "javascript:alert(1)"
    cellsan policy > policy.json
"#
    );
}

fn parse_options(args: &[String]) -> std::result::Result<Options, String> {
    let mut options = Options {
        policy: None,
        report: false,
        positional: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--policy" => match iter.next() {
                Some(path) => options.policy = Some(path.clone()),
                None => return Err("--policy requires a file path".to_string()),
            },
            "--report" => options.report = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            _ => options.positional.push(arg.clone()),
        }
    }

    Ok(options)
}

fn run(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn load_policy(options: &Options) -> Result<Policy> {
    match options.policy {
        Some(ref path) => {
            tracing::info!(path = %path, "loading policy");
            Policy::from_file(path)
        }
        None => Ok(Policy::default()),
    }
}

fn read_input(options: &Options) -> Result<String> {
    match options.positional.first() {
        Some(path) => fs::read_to_string(path).context(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("reading stdin")?;
            Ok(input)
        }
    }
}

fn sanitize_input(options: &Options) -> Result<()> {
    let sanitizer = Sanitizer::with_policy(load_policy(options)?);
    let input = read_input(options)?;
    let (html, report) = sanitizer.sanitize_with_report(&input)?;

    print!("{}", html);
    if options.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn print_lines(options: &Options) -> Result<()> {
    let sanitizer = Sanitizer::with_policy(load_policy(options)?);
    let input = read_input(options)?;
    let (html, report) = sanitizer.sanitize_with_report(&input)?;

    for line in extract_lines(&html) {
        println!("{}", line);
    }
    if options.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn check_url(options: &Options, url: &str) -> ExitCode {
    let policy = match load_policy(options) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    if policy.urls.is_safe_url(url) {
        println!("safe");
        ExitCode::SUCCESS
    } else {
        println!("unsafe");
        ExitCode::from(2)
    }
}

fn print_policy(options: &Options) -> Result<()> {
    let policy = load_policy(options)?;
    println!("{}", policy.to_json_pretty()?);
    Ok(())
}
