//! Explain command implementation.
//!
//! Compiles a filter expression and prints the canonical description of the
//! predicate tree, so users can check what a filter matches before running it.

use mailbox_filter::{describe, FilterParser};
use mailbox_store::to_imap_query;

use super::{CommandContext, Result};

/// Executes the explain command.
pub fn execute(ctx: &CommandContext, filter: &str) -> Result<()> {
    let term = FilterParser::parse(filter)?;
    let description = describe(&term);

    if ctx.json_output {
        let output = serde_json::json!({
            "filter": filter,
            "description": description,
            "imap_query": to_imap_query(&term),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{description}");
        if ctx.verbose {
            println!("IMAP query: {}", to_imap_query(&term));
        }
    }

    Ok(())
}
