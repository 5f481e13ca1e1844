//! Output formatting for the mbx CLI.
//!
//! Formats fetched messages either as readable text blocks or as JSON.

mod messages;

pub use messages::{format_folder_line, format_message, format_message_json, MessageOutput};
