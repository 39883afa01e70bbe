//! Counted flags and repeated values example.
//!
//! Shows how repeated occurrences of the same element accumulate: flags
//! and commands count, arguments and valued options collect a list.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p usage-pattern-demos --example counted
//! ```

use usage_pattern_core::ResponseKind;
use usage_pattern_parser::{HandlerConfig, UsageDoc};

const DOC: &str = "\
Usage: counted [-v...] [--path=<p>]... go go [<target>...]

Options:
  -v            More output (repeatable).
  --path=<p>    Search path [default: ./a ./b].
";

fn main() {
    let doc = match UsageDoc::compile(DOC) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("usage doc is broken: {err}");
            std::process::exit(2);
        }
    };
    println!("Compiled pattern: {}", doc.pattern());
    println!();

    let config = HandlerConfig::default();
    let samples: [&[&str]; 4] = [
        &["go", "go"],
        &["-vvv", "go", "go", "x", "y"],
        &["-v", "--path=/usr", "--path", "/opt", "go", "go"],
        &["go"],
    ];

    for argv in samples {
        let response = doc.parse_argv(argv.iter().copied(), &config);
        println!("argv: {argv:?}");
        if response.kind() == ResponseKind::Matched {
            println!("  -v       = {}", response["-v"]);
            println!("  --path   = {}", response["--path"]);
            println!("  go       = {}", response["go"]);
            println!("  <target> = {}", response["<target>"]);
        } else {
            println!("  rejected:\n  {}", response.output());
        }
        println!();
    }
}
