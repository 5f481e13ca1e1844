//! Filter expression compiler for mailbox searches.
//!
//! This crate parses the compact filter syntax accepted by the `mbx` CLI into
//! a [`SearchTerm`] predicate tree, and renders that tree back into a
//! human-readable description so users can see exactly what a filter matched.
//!
//! # Supported Syntax
//!
//! A filter is a list of `field:value` terms combined with two operators:
//!
//! - `+` - AND, binds tighter
//! - `|` - OR
//!
//! Prefixing a value with `!` negates that single term.
//!
//! ## Fields
//!
//! - `subject`, `body` - substring match on the message text
//! - `from`, `to`, `cc`, `bcc` - address match, falling back to a personal
//!   name match when the value is not a valid address
//! - `number` - message sequence number
//! - `received`, `received_before`, `received_after` - received date,
//!   formatted as `YYYY-MM-DDTHH.MM.SS`
//! - `sent`, `sent_before`, `sent_after` - sent date, same format
//! - `size_ge`, `size_le` - message size with a `kb` or `mb` suffix
//! - `flag` - message flag state, e.g. `flag:seen` or `flag:!seen`
//!
//! # Example
//!
//! ```
//! use mailbox_filter::{describe, FilterParser, SearchTerm};
//!
//! let term = FilterParser::parse("subject:hello+size_ge:4kb").unwrap();
//! assert!(matches!(term, SearchTerm::And(_, _)));
//! assert_eq!(
//!     describe(&term),
//!     "(subject contains \"hello\" and size greater than \"4096\" bytes)"
//! );
//! ```

mod ast;
mod error;
mod parser;
mod printer;
mod term;

pub use ast::{
    AddressPattern, DateComparison, MailFlag, RecipientKind, SearchTerm, SizeComparison,
};
pub use error::{FilterError, FilterResult};
pub use parser::FilterParser;
pub use printer::describe;
pub use term::resolve;
