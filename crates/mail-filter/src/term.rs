//! Leaf term resolution for filter expressions.
//!
//! Maps a `field:value` pair onto the matching [`SearchTerm`] leaf, parsing
//! dates, sizes, and addresses along the way.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use mailparse::{addrparse, MailAddr};

use crate::ast::{
    AddressPattern, DateComparison, MailFlag, RecipientKind, SearchTerm, SizeComparison,
};
use crate::error::{FilterError, FilterResult};

/// Timestamps in filter values use dots instead of colons so the value
/// survives the `field:value` split.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H.%M.%S";

/// Resolves a single `field:value` pair into a leaf term.
///
/// # Errors
///
/// Returns `FilterError::UnknownField` if `field` is not part of the filter
/// grammar, and `FilterError::InvalidValue` if `value` cannot be parsed for
/// the field's expected type.
pub fn resolve(field: &str, value: &str) -> FilterResult<SearchTerm> {
    match field {
        "subject" => Ok(SearchTerm::Subject(value.to_string())),
        "body" => Ok(SearchTerm::Body(value.to_string())),

        "from" => Ok(SearchTerm::From(address_pattern(value))),
        "to" => Ok(SearchTerm::Recipient(
            RecipientKind::To,
            address_pattern(value),
        )),
        "cc" => Ok(SearchTerm::Recipient(
            RecipientKind::Cc,
            address_pattern(value),
        )),
        "bcc" => Ok(SearchTerm::Recipient(
            RecipientKind::Bcc,
            address_pattern(value),
        )),

        "number" => {
            let number = value
                .parse::<u32>()
                .map_err(|_| FilterError::invalid_value(field, value))?;
            Ok(SearchTerm::MessageNumber(number))
        }

        "received" => Ok(SearchTerm::ReceivedDate(
            DateComparison::Eq,
            parse_timestamp(field, value)?,
        )),
        "received_after" => Ok(SearchTerm::ReceivedDate(
            DateComparison::Ge,
            parse_timestamp(field, value)?,
        )),
        "received_before" => Ok(SearchTerm::ReceivedDate(
            DateComparison::Le,
            parse_timestamp(field, value)?,
        )),

        "sent" => Ok(SearchTerm::SentDate(
            DateComparison::Eq,
            parse_timestamp(field, value)?,
        )),
        "sent_after" => Ok(SearchTerm::SentDate(
            DateComparison::Ge,
            parse_timestamp(field, value)?,
        )),
        "sent_before" => Ok(SearchTerm::SentDate(
            DateComparison::Le,
            parse_timestamp(field, value)?,
        )),

        "size_ge" => Ok(SearchTerm::Size(
            SizeComparison::Ge,
            parse_size(field, value)?,
        )),
        "size_le" => Ok(SearchTerm::Size(
            SizeComparison::Le,
            parse_size(field, value)?,
        )),

        "flag" => Ok(SearchTerm::Flag {
            flag: resolve_flag(value),
            set: true,
        }),

        _ => Err(FilterError::unknown_field(field)),
    }
}

/// Resolves a flag name, matching built-ins case-sensitively.
fn resolve_flag(value: &str) -> MailFlag {
    match value {
        "seen" => MailFlag::Seen,
        "flagged" => MailFlag::Flagged,
        _ => MailFlag::Custom(value.to_string()),
    }
}

/// Resolves an address value.
///
/// A value that parses and validates as a structured address becomes an
/// [`AddressPattern::Address`]; anything else falls back to a trimmed
/// personal-name pattern. This never fails.
fn address_pattern(value: &str) -> AddressPattern {
    match validated_address(value) {
        Some(addr) => AddressPattern::Address(addr),
        None => AddressPattern::Personal(value.trim().to_string()),
    }
}

/// Attempts a strict parse + validation of an address value.
///
/// Commas are stripped first so a single address pasted from an address book
/// does not turn into an address list.
fn validated_address(value: &str) -> Option<String> {
    let cleaned = value.replace(',', "");
    let parsed = addrparse(&cleaned).ok()?;
    let single = match parsed.first()? {
        MailAddr::Single(info) => info,
        MailAddr::Group(_) => return None,
    };

    if !is_valid_address(&single.addr) {
        return None;
    }

    Some(match &single.display_name {
        Some(name) => format!("{name} <{}>", single.addr),
        None => single.addr.clone(),
    })
}

/// Checks that an address has a plausible `local@domain` shape.
fn is_valid_address(addr: &str) -> bool {
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !addr.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Parses a filter timestamp into a local date-time.
fn parse_timestamp(field: &str, value: &str) -> FilterResult<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|_| FilterError::invalid_value(field, value))?;

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(date) => Ok(date),
        // DST fold: take the earlier of the two wall-clock readings.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(FilterError::invalid_value(field, value)),
    }
}

/// Parses a size value such as `4kb` or `2.5mb` into a byte count.
fn parse_size(field: &str, value: &str) -> FilterResult<u32> {
    if value.len() < 3 || !value.is_char_boundary(value.len() - 2) {
        return Err(FilterError::invalid_value(field, value));
    }

    let (number, unit) = value.split_at(value.len() - 2);
    let multiplier = if unit.eq_ignore_ascii_case("kb") {
        1024.0
    } else if unit.eq_ignore_ascii_case("mb") {
        1024.0 * 1024.0
    } else {
        return Err(FilterError::invalid_value(field, value));
    };

    let size = number
        .parse::<f64>()
        .map_err(|_| FilterError::invalid_value(field, value))?;
    if !size.is_finite() || size < 0.0 {
        return Err(FilterError::invalid_value(field, value));
    }

    Ok((size * multiplier).round() as u32)
}
