//! Abstract Syntax Tree (AST) for mailbox filter expressions.

use chrono::{DateTime, Local};

/// Represents a parsed filter expression.
///
/// The `SearchTerm` enum is the AST for mailbox filter expressions. Leaf
/// variants describe a single message predicate; the boolean variants combine
/// them into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    // ==================== Boolean Operators ====================
    /// Logical AND of two terms.
    And(Box<SearchTerm>, Box<SearchTerm>),

    /// Logical OR of two terms.
    Or(Box<SearchTerm>, Box<SearchTerm>),

    /// Logical NOT of a term.
    Not(Box<SearchTerm>),

    // ==================== Text Predicates ====================
    /// Matches messages whose subject contains the pattern.
    Subject(String),

    /// Matches messages whose body contains the pattern.
    Body(String),

    // ==================== Address Predicates ====================
    /// Matches messages sent from the given address or personal name.
    From(AddressPattern),

    /// Matches messages addressed to the given address or personal name
    /// in the named recipient header.
    Recipient(RecipientKind, AddressPattern),

    // ==================== Envelope Predicates ====================
    /// Matches the message with the given sequence number in the folder.
    MessageNumber(u32),

    /// Matches messages by the date they were received.
    ReceivedDate(DateComparison, DateTime<Local>),

    /// Matches messages by the date they were sent.
    SentDate(DateComparison, DateTime<Local>),

    /// Matches messages by size in bytes.
    Size(SizeComparison, u32),

    /// Matches messages with the given flag in the given state.
    Flag {
        /// The flag to test.
        flag: MailFlag,
        /// Whether the flag must be set or cleared.
        set: bool,
    },
}

impl SearchTerm {
    /// Creates an AND term from two terms.
    ///
    /// # Example
    ///
    /// ```
    /// use mailbox_filter::SearchTerm;
    ///
    /// let term = SearchTerm::and(
    ///     SearchTerm::Subject("a".into()),
    ///     SearchTerm::Body("b".into()),
    /// );
    /// assert!(matches!(term, SearchTerm::And(_, _)));
    /// ```
    pub fn and(left: SearchTerm, right: SearchTerm) -> Self {
        SearchTerm::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR term from two terms.
    pub fn or(left: SearchTerm, right: SearchTerm) -> Self {
        SearchTerm::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT term from another term.
    pub fn negate(inner: SearchTerm) -> Self {
        SearchTerm::Not(Box::new(inner))
    }
}

/// The pattern an address predicate matches against.
///
/// Values that parse as a structured address match on the address header
/// itself; anything else matches on the sender's personal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressPattern {
    /// A structured address such as `test@gmail.com` or
    /// `John Smith <john@example.com>`.
    Address(String),

    /// A personal display name, matched exactly (case-insensitive).
    Personal(String),
}

impl AddressPattern {
    /// Returns the pattern text as entered or normalized.
    pub fn as_str(&self) -> &str {
        match self {
            AddressPattern::Address(addr) => addr,
            AddressPattern::Personal(name) => name,
        }
    }
}

/// The recipient header an address predicate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    /// The `To` header.
    To,
    /// The `Cc` header.
    Cc,
    /// The `Bcc` header.
    Bcc,
}

/// How a date predicate compares against the message date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComparison {
    /// The message date falls on the given date.
    Eq,
    /// The message date is on or before the given date.
    Le,
    /// The message date is on or after the given date.
    Ge,
}

/// How a size predicate compares against the message size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeComparison {
    /// The message is at most this many bytes.
    Le,
    /// The message is at least this many bytes.
    Ge,
}

/// A message flag tested by a flag predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailFlag {
    /// The standard read/seen flag.
    Seen,
    /// The standard starred/flagged flag.
    Flagged,
    /// A user-defined keyword flag.
    Custom(String),
}

impl MailFlag {
    /// Returns the flag name as shown in filter descriptions.
    pub fn display_name(&self) -> &str {
        match self {
            MailFlag::Seen => "Seen",
            MailFlag::Flagged => "Flagged",
            MailFlag::Custom(name) => name,
        }
    }
}
