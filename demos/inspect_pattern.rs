//! Pattern inspection example.
//!
//! Walks the intermediate stages of compiling a usage doc: the sections
//! found in the text, the option descriptions, the formal usage and the
//! final pattern with its merged identities.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p usage-pattern-demos --example inspect_pattern
//! ```

use usage_pattern_core::OptionRegistry;
use usage_pattern_parser::{
    FormalUsage, Section, UsageDoc, parse_defaults, parse_pattern, parse_section, pattern_tokens,
};

const DOC: &str = "\
Usage:
  tool [options] <file>
  tool --list

Options:
  -o FILE --output=FILE  Where to write [default: out.txt].
  -q --quiet             Say less.
  --list                 List known formats.
";

fn main() {
    let usage = parse_section(Section::Usage, DOC);
    println!("Usage sections: {usage:?}");

    let described = match parse_defaults(DOC) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("bad options section: {err}");
            return;
        }
    };
    println!("Described options:");
    for leaf in described.iter() {
        println!("  {leaf}");
    }

    let formal = FormalUsage::from_section(&usage[0]);
    println!("Formal usage: {formal}");
    println!("Tokens: {:?}", pattern_tokens(&formal.to_string()));

    // Parsing alone leaves the [options] shortcut empty.
    let mut registry: OptionRegistry = described.clone();
    match parse_pattern(&formal.to_string(), &mut registry) {
        Ok(pattern) => println!("Parsed: {pattern}"),
        Err(err) => eprintln!("bad usage pattern: {err}"),
    }

    match UsageDoc::compile(DOC) {
        Ok(doc) => {
            println!("Compiled: {}", doc.pattern());
            println!("Identities:");
            for id in doc.pattern().identities() {
                println!("  {:>2}  {}", id.index(), doc.pattern().leaf(id));
            }
        }
        Err(err) => eprintln!("bad usage doc: {err}"),
    }
}
