//! Canonical human-readable rendering of filter trees.
//!
//! The output of [`describe`] is part of the crate's contract: `explain`
//! prints it for user diagnostics and the test suite asserts on it exactly.

use crate::ast::{DateComparison, RecipientKind, SearchTerm, SizeComparison};

/// Renders a filter tree as a single-line description.
///
/// Combinators parenthesize their operands, so the printed shape mirrors the
/// tree shape: `a+b|c` renders as `((a and b) or c)`.
pub fn describe(term: &SearchTerm) -> String {
    match term {
        SearchTerm::And(left, right) => {
            format!("({} and {})", describe(left), describe(right))
        }
        SearchTerm::Or(left, right) => {
            format!("({} or {})", describe(left), describe(right))
        }
        SearchTerm::Not(inner) => format!("not {}", describe(inner)),

        SearchTerm::Subject(pattern) => format!("subject contains \"{pattern}\""),
        SearchTerm::Body(pattern) => format!("body contains \"{pattern}\""),

        SearchTerm::From(pattern) => format!("sender is \"{}\"", pattern.as_str()),
        SearchTerm::Recipient(kind, pattern) => match kind {
            RecipientKind::To => format!("recipient is \"{}\"", pattern.as_str()),
            RecipientKind::Cc => format!("cc sent to \"{}\"", pattern.as_str()),
            RecipientKind::Bcc => format!("bcc sent to \"{}\"", pattern.as_str()),
        },

        SearchTerm::MessageNumber(number) => format!("message number is \"{number}\""),

        SearchTerm::ReceivedDate(cmp, date) => match cmp {
            DateComparison::Eq => format!("received date is \"{date}\""),
            DateComparison::Le => format!("received before date \"{date}\""),
            DateComparison::Ge => format!("received after date \"{date}\""),
        },
        SearchTerm::SentDate(cmp, date) => match cmp {
            DateComparison::Eq => format!("sent date is \"{date}\""),
            DateComparison::Le => format!("sent before date \"{date}\""),
            DateComparison::Ge => format!("sent after date \"{date}\""),
        },

        SearchTerm::Size(cmp, bytes) => match cmp {
            SizeComparison::Ge => format!("size greater than \"{bytes}\" bytes"),
            SizeComparison::Le => format!("size less than \"{bytes}\" bytes"),
        },

        SearchTerm::Flag { flag, set } => {
            let state = if *set { "set" } else { "not set" };
            format!("flag \"{}\" {state}", flag.display_name())
        }
    }
}
