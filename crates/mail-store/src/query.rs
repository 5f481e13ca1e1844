//! Translation of filter trees into IMAP SEARCH programs.
//!
//! The translation is isomorphic to the tree: one search key per leaf, one
//! connective per combinator. AND is juxtaposition inside a parenthesized
//! list, OR and NOT are the prefix keys of the same name.

use chrono::{DateTime, Local};
use mailbox_filter::{DateComparison, MailFlag, RecipientKind, SearchTerm, SizeComparison};

/// IMAP date syntax, e.g. `3-Jan-2024`.
const IMAP_DATE_FORMAT: &str = "%d-%b-%Y";

/// Renders a filter tree as an IMAP SEARCH program.
///
/// Personal-name address patterns translate to the same header-substring
/// keys as validated addresses; the store's substring semantics subsume the
/// exact personal-name match.
pub fn to_imap_query(term: &SearchTerm) -> String {
    match term {
        SearchTerm::And(left, right) => {
            format!("({} {})", to_imap_query(left), to_imap_query(right))
        }
        SearchTerm::Or(left, right) => {
            format!("OR {} {}", to_imap_query(left), to_imap_query(right))
        }
        SearchTerm::Not(inner) => format!("NOT {}", to_imap_query(inner)),

        SearchTerm::Subject(pattern) => format!("SUBJECT {}", quote(pattern)),
        SearchTerm::Body(pattern) => format!("BODY {}", quote(pattern)),

        SearchTerm::From(pattern) => format!("FROM {}", quote(pattern.as_str())),
        SearchTerm::Recipient(kind, pattern) => {
            let key = match kind {
                RecipientKind::To => "TO",
                RecipientKind::Cc => "CC",
                RecipientKind::Bcc => "BCC",
            };
            format!("{key} {}", quote(pattern.as_str()))
        }

        SearchTerm::MessageNumber(number) => number.to_string(),

        SearchTerm::ReceivedDate(cmp, date) => match cmp {
            DateComparison::Eq => format!("ON {}", imap_date(date)),
            DateComparison::Ge => format!("SINCE {}", imap_date(date)),
            DateComparison::Le => format!("BEFORE {}", imap_date(date)),
        },
        SearchTerm::SentDate(cmp, date) => match cmp {
            DateComparison::Eq => format!("SENTON {}", imap_date(date)),
            DateComparison::Ge => format!("SENTSINCE {}", imap_date(date)),
            DateComparison::Le => format!("SENTBEFORE {}", imap_date(date)),
        },

        SearchTerm::Size(cmp, bytes) => match cmp {
            SizeComparison::Ge => format!("LARGER {bytes}"),
            SizeComparison::Le => format!("SMALLER {bytes}"),
        },

        SearchTerm::Flag { flag, set } => match (flag, set) {
            (MailFlag::Seen, true) => "SEEN".to_string(),
            (MailFlag::Seen, false) => "UNSEEN".to_string(),
            (MailFlag::Flagged, true) => "FLAGGED".to_string(),
            (MailFlag::Flagged, false) => "UNFLAGGED".to_string(),
            (MailFlag::Custom(name), true) => format!("KEYWORD {}", quote(name)),
            (MailFlag::Custom(name), false) => format!("UNKEYWORD {}", quote(name)),
        },
    }
}

/// Quotes a search string, escaping backslashes and double quotes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn imap_date(date: &DateTime<Local>) -> String {
    date.format(IMAP_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mailbox_filter::FilterParser;

    use super::*;

    fn translate(input: &str) -> String {
        to_imap_query(&FilterParser::parse(input).unwrap())
    }

    #[test]
    fn test_text_terms() {
        assert_eq!(translate("subject:hello"), "SUBJECT \"hello\"");
        assert_eq!(translate("body:invoice"), "BODY \"invoice\"");
    }

    #[test]
    fn test_quoting_escapes() {
        assert_eq!(
            translate("subject:say \"hi\""),
            "SUBJECT \"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_address_terms() {
        assert_eq!(translate("from:a@x.com"), "FROM \"a@x.com\"");
        assert_eq!(translate("to:b@x.com"), "TO \"b@x.com\"");
        assert_eq!(translate("cc:c@x.com"), "CC \"c@x.com\"");
        assert_eq!(translate("bcc:d@x.com"), "BCC \"d@x.com\"");
    }

    #[test]
    fn test_personal_name_uses_substring_key() {
        assert_eq!(translate("from:John Smith"), "FROM \"John Smith\"");
    }

    #[test]
    fn test_message_number_is_sequence_set() {
        assert_eq!(translate("number:7"), "7");
    }

    #[test]
    fn test_received_dates() {
        assert_eq!(translate("received:2024-01-03T10.15.30"), "ON 03-Jan-2024");
        assert_eq!(
            translate("received_after:2024-01-03T10.15.30"),
            "SINCE 03-Jan-2024"
        );
        assert_eq!(
            translate("received_before:2024-01-03T10.15.30"),
            "BEFORE 03-Jan-2024"
        );
    }

    #[test]
    fn test_sent_dates() {
        assert_eq!(translate("sent:2023-06-10T08.00.00"), "SENTON 10-Jun-2023");
        assert_eq!(
            translate("sent_after:2023-06-10T08.00.00"),
            "SENTSINCE 10-Jun-2023"
        );
        assert_eq!(
            translate("sent_before:2023-06-10T08.00.00"),
            "SENTBEFORE 10-Jun-2023"
        );
    }

    #[test]
    fn test_sizes() {
        assert_eq!(translate("size_ge:100kb"), "LARGER 102400");
        assert_eq!(translate("size_le:4kb"), "SMALLER 4096");
    }

    #[test]
    fn test_flags() {
        assert_eq!(translate("flag:seen"), "SEEN");
        assert_eq!(translate("flag:!seen"), "UNSEEN");
        assert_eq!(translate("flag:flagged"), "FLAGGED");
        assert_eq!(translate("flag:!flagged"), "UNFLAGGED");
        assert_eq!(translate("flag:starred"), "KEYWORD \"starred\"");
        assert_eq!(translate("flag:!starred"), "UNKEYWORD \"starred\"");
    }

    #[test]
    fn test_combinators_mirror_tree_shape() {
        assert_eq!(
            translate("subject:a+body:b"),
            "(SUBJECT \"a\" BODY \"b\")"
        );
        assert_eq!(
            translate("subject:a|body:b"),
            "OR SUBJECT \"a\" BODY \"b\""
        );
        assert_eq!(
            translate("subject:a+body:b|flag:seen"),
            "OR (SUBJECT \"a\" BODY \"b\") SEEN"
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(translate("subject:!Work"), "NOT SUBJECT \"Work\"");
    }

    #[test]
    fn test_date_formatting() {
        let date = Local.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(imap_date(&date), "01-Dec-2024");
    }
}
