//! Parsed summaries of fetched messages.

use chrono::{DateTime, Local, TimeZone};
use mailparse::{addrparse_header, dateparse, parse_mail, MailAddr, MailHeaderMap};
use uuid::Uuid;

use crate::error::Result;
use crate::store::FetchedMessage;

/// Attachment directory names are truncated to stay filesystem-safe.
const MAX_DIR_NAME: usize = 150;

/// Header-level summary of a fetched message, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    /// Sequence number in the folder.
    pub seq: u32,
    /// Decoded subject, empty when the header is missing.
    pub subject: String,
    /// Sent date from the `Date` header, in the local timezone.
    pub date: Option<DateTime<Local>>,
    /// Rendered `From` addresses.
    pub from: Vec<String>,
    /// Rendered `To` addresses.
    pub to: Vec<String>,
    /// Rendered `Cc` addresses.
    pub cc: Vec<String>,
    /// Rendered `Reply-To` addresses.
    pub reply_to: Vec<String>,
    /// Message size in bytes, when the store reported one.
    pub size: Option<u32>,
    /// Whether the seen flag is set.
    pub seen: bool,
    /// Whether the flagged flag is set.
    pub flagged: bool,
}

impl MessageSummary {
    /// Parses the headers of a fetched message into a summary.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MailParse` when the body is not a parseable
    /// RFC822 message.
    pub fn parse(fetched: &FetchedMessage) -> Result<Self> {
        let parsed = parse_mail(&fetched.body)?;

        let date = parsed
            .headers
            .get_first_value("Date")
            .and_then(|raw| dateparse(&raw).ok())
            .and_then(|epoch| Local.timestamp_opt(epoch, 0).single());

        Ok(Self {
            seq: fetched.seq,
            subject: parsed.headers.get_first_value("Subject").unwrap_or_default(),
            date,
            from: address_list(&parsed, "From"),
            to: address_list(&parsed, "To"),
            cc: address_list(&parsed, "Cc"),
            reply_to: address_list(&parsed, "Reply-To"),
            size: fetched.size,
            seen: fetched.seen,
            flagged: fetched.flagged,
        })
    }

    /// Returns the bare address of the first sender, for slug construction.
    pub fn sender_address(&self) -> &str {
        self.from.first().map(String::as_str).unwrap_or("unknown")
    }
}

/// Renders the addresses of one header into display strings.
fn address_list(parsed: &mailparse::ParsedMail<'_>, name: &str) -> Vec<String> {
    let Some(header) = parsed.headers.get_first_header(name) else {
        return Vec::new();
    };
    let Ok(addresses) = addrparse_header(header) else {
        return Vec::new();
    };
    addresses.iter().map(render_address).collect()
}

fn render_address(address: &MailAddr) -> String {
    match address {
        MailAddr::Single(single) => match &single.display_name {
            Some(name) => format!("{name} <{}>", single.addr),
            None => single.addr.clone(),
        },
        MailAddr::Group(group) => group.group_name.clone(),
    }
}

/// Builds a unique directory name for a message's saved attachments.
///
/// The name combines a random component with the sender and a slugified
/// subject so a directory listing stays human-readable.
pub fn attachment_dir(from: &str, subject: &str) -> String {
    let from = from.replace('@', "_at_");

    let mut slug = String::new();
    let mut prev_underscore = false;
    for c in subject.to_lowercase().chars() {
        let mapped = if c.is_whitespace() { '_' } else { c };
        if mapped == '_' || mapped == '-' || mapped.is_ascii_alphanumeric() {
            if mapped == '_' && prev_underscore {
                continue;
            }
            prev_underscore = mapped == '_';
            slug.push(mapped);
        }
    }

    let name = format!("{}_{}_{}", Uuid::new_v4(), from, slug);
    name.chars().take(MAX_DIR_NAME).collect()
}
