//! Split-based parser for filter expressions.

use super::ast::SearchTerm;
use super::error::{FilterError, FilterResult};
use super::term;

/// Parser for mailbox filter expressions.
///
/// The grammar is flat: the expression is split on `|` into OR branches,
/// each branch is split on `+` into AND terms, and each term is a single
/// `field:value` pair, optionally negated with a `!` prefix on the value.
///
/// # Grammar
///
/// ```text
/// expression ::= branch ("|" branch)*
/// branch     ::= term ("+" term)*
/// term       ::= field ":" ["!"] value
/// ```
///
/// Both combinators fold left, so `a+b+c` parses as `((a AND b) AND c)`.
/// `+` binds tighter than `|`.
///
/// # Example
///
/// ```
/// use mailbox_filter::{FilterParser, SearchTerm};
///
/// let term = FilterParser::parse("subject:urgent").unwrap();
/// assert!(matches!(term, SearchTerm::Subject(_)));
///
/// let term = FilterParser::parse("subject:urgent|flag:seen").unwrap();
/// assert!(matches!(term, SearchTerm::Or(_, _)));
/// ```
pub struct FilterParser;

impl FilterParser {
    /// Parses a filter expression string into a `SearchTerm` tree.
    ///
    /// # Arguments
    ///
    /// * `input` - The filter expression to parse
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidExpression` if the expression or any of
    /// its fragments is structurally malformed, `FilterError::UnknownField`
    /// for an unrecognized field name, and `FilterError::InvalidValue` when
    /// a value cannot be parsed for its field.
    pub fn parse(input: &str) -> FilterResult<SearchTerm> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FilterError::invalid_expression(input));
        }

        let mut query: Option<SearchTerm> = None;
        for branch in trimmed.split('|') {
            let term = Self::parse_branch(branch)?;
            query = Some(match query {
                Some(left) => SearchTerm::or(left, term),
                None => term,
            });
        }

        query.ok_or_else(|| FilterError::invalid_expression(input))
    }

    /// Parses one OR branch: `term ("+" term)*`
    fn parse_branch(branch: &str) -> FilterResult<SearchTerm> {
        if branch.is_empty() {
            return Err(FilterError::invalid_expression(branch));
        }

        let mut group: Option<SearchTerm> = None;
        for token in branch.split('+') {
            let term = Self::parse_term(token)?;
            group = Some(match group {
                Some(left) => SearchTerm::and(left, term),
                None => term,
            });
        }

        group.ok_or_else(|| FilterError::invalid_expression(branch))
    }

    /// Parses one `field:value` term, handling the `!` negation prefix.
    fn parse_term(token: &str) -> FilterResult<SearchTerm> {
        let parts: Vec<&str> = token.split(':').collect();
        let (field, value) = match parts.as_slice() {
            [field, value] if !field.is_empty() && !value.is_empty() => (*field, *value),
            _ => return Err(FilterError::invalid_expression(token)),
        };

        let (value, negated) = match value.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (value, false),
        };
        if value.is_empty() {
            return Err(FilterError::invalid_expression(token));
        }

        let leaf = term::resolve(field, value)?;
        Ok(if negated { negate_leaf(leaf) } else { leaf })
    }
}

/// Negates a resolved leaf.
///
/// Flag terms flip their target state instead of being wrapped, so
/// `flag:!seen` searches for unseen messages rather than "not (seen set)".
fn negate_leaf(leaf: SearchTerm) -> SearchTerm {
    match leaf {
        SearchTerm::Flag { flag, set } => SearchTerm::Flag { flag, set: !set },
        other => SearchTerm::negate(other),
    }
}
