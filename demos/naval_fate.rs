//! Naval Fate example.
//!
//! Demonstrates the one-call entry point: describe the interface in a usage
//! doc, hand it the process arguments, and read back the bound values.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p usage-pattern-demos --example naval_fate -- ship Guardian move 10 50 --speed=20
//! cargo run -p usage-pattern-demos --example naval_fate -- mine set 1 2 --drifting
//! cargo run -p usage-pattern-demos --example naval_fate -- --help
//! ```

use usage_pattern_parser::{Handler, HandlerConfig};

const DOC: &str = "\
Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate ship shoot <x> <y>
  naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
  naval_fate -h | --help
  naval_fate --version

Options:
  -h --help     Show this screen.
  --version     Show version.
  --speed=<kn>  Speed in knots [default: 10].
  --moored      Moored (anchored) mine.
  --drifting    Drifting mine.
";

fn main() {
    // Help, version and syntax errors print and exit on their own.
    let handler = Handler::new(
        HandlerConfig::default()
            .with_version("Naval Fate 2.0")
            .with_exit(true),
    );

    let response = match handler.handle(DOC, std::env::args().skip(1)) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("usage doc is broken: {err}");
            std::process::exit(2);
        }
    };

    if response["ship"].is_truthy() && response["new"].is_truthy() {
        for name in response["<name>"].as_list().unwrap_or_default() {
            println!("Launching ship {name}");
        }
    } else if response["move"].is_truthy() {
        println!(
            "Moving {} to ({}, {}) at {} knots",
            response["<name>"],
            response["<x>"],
            response["<y>"],
            response["--speed"]
        );
    } else if response["shoot"].is_truthy() {
        println!("Shooting at ({}, {})", response["<x>"], response["<y>"]);
    } else if response["mine"].is_truthy() {
        let action = if response["set"].is_truthy() { "Setting" } else { "Removing" };
        let kind = if response["--drifting"].is_truthy() { "drifting" } else { "moored" };
        println!("{action} {kind} mine at ({}, {})", response["<x>"], response["<y>"]);
    }

    println!();
    println!("All bound values:");
    println!(
        "{}",
        serde_json::to_string_pretty(response.args()).unwrap_or_default()
    );
}
