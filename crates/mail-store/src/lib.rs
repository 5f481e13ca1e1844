//! Mail store collaborators for the `mbx` client.
//!
//! This crate owns everything that talks to the outside world on behalf of
//! the filter compiler and the CLI:
//!
//! - [`query`] translates a [`mailbox_filter::SearchTerm`] tree into an IMAP
//!   SEARCH program
//! - [`store`] holds the IMAP session: connect, examine, search, fetch, and
//!   a cancellable NOOP keep-alive task
//! - [`message`] parses fetched messages into displayable summaries
//! - [`render`] walks a MIME body tree into text and attachment parts
//! - [`send`] builds and submits outgoing multipart messages over SMTP
//! - [`quote`] fetches a quote of the day for messages sent without a body

pub mod error;
pub mod message;
pub mod query;
pub mod quote;
pub mod render;
pub mod send;
pub mod store;

pub use error::{Result, StoreError};
pub use message::MessageSummary;
pub use query::to_imap_query;
pub use store::{FetchedMessage, FolderStats, KeepAlive, MailStore};
