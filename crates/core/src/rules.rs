//! Field rules and the per-row evaluator.
//!
//! Every rule is bound to one logical column and yields at most one
//! [`ErrorEntry`] per cell: the first failing check wins, so an empty cell
//! reports "required field" and never also "invalid format".

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::is_blank;
use crate::table::HeaderIndex;

// ── Failure comments ─────────────────────────────────────────────────

pub const COMMENT_REQUIRED: &str = "required field";
pub const COMMENT_INVALID_FORMAT: &str = "invalid format";
pub const COMMENT_INVALID_VALUE: &str = "invalid value";
pub const COMMENT_NOT_INTEGER: &str = "must be integer";
pub const COMMENT_OUT_OF_RANGE: &str = "out of range";
pub const COMMENT_DUPLICATE: &str = "duplicate value; suggest removing the duplicate.";

// ── Types ────────────────────────────────────────────────────────────

/// One detected problem in one cell.
///
/// `row` is 1-based counting the header as row 1, so the first record is
/// row 2, matching what a spreadsheet program shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub comment: String,
}

impl ErrorEntry {
    pub fn new(row: usize, column: &str, value: &str, comment: &str) -> Self {
        Self {
            row,
            column: column.to_string(),
            value: value.to_string(),
            comment: comment.to_string(),
        }
    }
}

/// What a column holds and therefore how its cells are checked.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Non-empty and matching a structural pattern (CURP, RFC, postal code).
    /// The raw cell is matched, so surrounding spaces fail the format check.
    Pattern(Regex),
    /// Non-empty and one of a fixed set of codes, compared after trimming.
    OneOf(Vec<String>),
    /// Non-empty plain decimal integer within `[min, max]`. Only an optional
    /// leading `-` and ASCII digits are accepted.
    BoundedInteger { min: i64, max: i64 },
    /// Non-empty; any content accepted.
    Required,
}

/// A check bound to one column.
///
/// When `optional` is set the rule only runs if the header carries the
/// column; otherwise the column is part of the schema's required set.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub column: String,
    pub kind: FieldKind,
    pub optional: bool,
}

impl FieldRule {
    pub fn required(column: &str, kind: FieldKind) -> Self {
        Self {
            column: column.to_string(),
            kind,
            optional: false,
        }
    }

    pub fn optional(column: &str, kind: FieldKind) -> Self {
        Self {
            column: column.to_string(),
            kind,
            optional: true,
        }
    }

    /// Check one cell value. Returns the failure comment, if any.
    pub fn check(&self, value: &str) -> Option<&'static str> {
        if is_blank(value) {
            return Some(COMMENT_REQUIRED);
        }

        match &self.kind {
            FieldKind::Required => None,
            FieldKind::Pattern(re) => (!re.is_match(value)).then_some(COMMENT_INVALID_FORMAT),
            FieldKind::OneOf(allowed) => {
                let value = value.trim();
                (!allowed.iter().any(|a| a == value)).then_some(COMMENT_INVALID_VALUE)
            }
            FieldKind::BoundedInteger { min, max } => match parse_plain_integer(value.trim()) {
                None => Some(COMMENT_NOT_INTEGER),
                Some(n) if n < *min || n > *max => Some(COMMENT_OUT_OF_RANGE),
                Some(_) => None,
            },
        }
    }
}

/// `i64::from_str` also takes a leading `+`; registry values never carry one.
fn parse_plain_integer(value: &str) -> Option<i64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

// ── Evaluation ───────────────────────────────────────────────────────

/// Run every applicable rule against one record.
///
/// `row_number` is the 1-based spreadsheet row (header = 1). Rules for
/// required columns absent from the header read an empty string; callers
/// are expected to have short-circuited on missing columns already.
pub fn validate_row(
    rules: &[FieldRule],
    row: &[String],
    row_number: usize,
    index: &HeaderIndex,
) -> Vec<ErrorEntry> {
    rules
        .iter()
        .filter(|rule| !rule.optional || index.contains(&rule.column))
        .filter_map(|rule| {
            let value = index.lookup(row, &rule.column);
            rule.check(value)
                .map(|comment| ErrorEntry::new(row_number, &rule.column, value, comment))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn digits(n: usize) -> FieldKind {
        FieldKind::Pattern(Regex::new(&format!(r"^\d{{{n}}}$")).unwrap())
    }

    #[test]
    fn required_rejects_blank() {
        let rule = FieldRule::required("NOMBRE", FieldKind::Required);
        assert_eq!(rule.check(""), Some(COMMENT_REQUIRED));
        assert_eq!(rule.check("   "), Some(COMMENT_REQUIRED));
        assert_eq!(rule.check("ANA"), None);
    }

    #[test]
    fn pattern_checks_raw_value() {
        let rule = FieldRule::required("CODIGO_POSTAL", digits(5));
        assert_eq!(rule.check("44100"), None);
        assert_eq!(rule.check(" 44100 "), Some(COMMENT_INVALID_FORMAT));
        assert_eq!(rule.check("4410"), Some(COMMENT_INVALID_FORMAT));
        assert_eq!(rule.check(""), Some(COMMENT_REQUIRED));
    }

    #[test]
    fn identity_code_with_surrounding_spaces_is_invalid_format() {
        let curp = Regex::new(crate::schema::DEFAULT_CURP_PATTERN).unwrap();
        let rule = FieldRule::required("CURP", FieldKind::Pattern(curp));
        assert_eq!(rule.check("GODE561231HDFRRN09"), None);
        assert_eq!(rule.check(" GODE561231HDFRRN09 "), Some(COMMENT_INVALID_FORMAT));
    }

    #[test]
    fn one_of_is_exact_after_trim() {
        let rule = FieldRule::required("SEXO", FieldKind::OneOf(vec!["H".into(), "M".into()]));
        assert_eq!(rule.check("H"), None);
        assert_eq!(rule.check(" M "), None);
        assert_eq!(rule.check("X"), Some(COMMENT_INVALID_VALUE));
        assert_eq!(rule.check("h"), Some(COMMENT_INVALID_VALUE));
    }

    #[test]
    fn bounded_integer_edges() {
        let rule = FieldRule::required("EDAD", FieldKind::BoundedInteger { min: 0, max: 120 });
        assert_eq!(rule.check("0"), None);
        assert_eq!(rule.check("120"), None);
        assert_eq!(rule.check("121"), Some(COMMENT_OUT_OF_RANGE));
        assert_eq!(rule.check("-1"), Some(COMMENT_OUT_OF_RANGE));
        assert_eq!(rule.check("30.5"), Some(COMMENT_NOT_INTEGER));
        assert_eq!(rule.check("treinta"), Some(COMMENT_NOT_INTEGER));
    }

    #[test]
    fn bounded_integer_rejects_signs_and_separators() {
        let rule = FieldRule::required("EDAD", FieldKind::BoundedInteger { min: 0, max: 120 });
        assert_eq!(rule.check("+30"), Some(COMMENT_NOT_INTEGER));
        assert_eq!(rule.check("-"), Some(COMMENT_NOT_INTEGER));
        assert_eq!(rule.check("1_0"), Some(COMMENT_NOT_INTEGER));
        assert_eq!(rule.check(" 30 "), None);
        assert_eq!(rule.check("99999999999999999999"), Some(COMMENT_NOT_INTEGER));
    }

    #[test]
    fn optional_rule_skipped_when_column_absent() {
        let rules = vec![FieldRule::optional("CODIGO_POSTAL", digits(5))];
        let index = HeaderIndex::from_header(&row(&["CURP"]));
        assert!(validate_row(&rules, &row(&["X"]), 2, &index).is_empty());
    }

    #[test]
    fn optional_rule_runs_when_column_present() {
        let rules = vec![FieldRule::optional("CODIGO_POSTAL", digits(5))];
        let index = HeaderIndex::from_header(&row(&["CURP", "CODIGO_POSTAL"]));
        let errors = validate_row(&rules, &row(&["X", "123"]), 5, &index);
        assert_eq!(errors, vec![ErrorEntry::new(5, "CODIGO_POSTAL", "123", COMMENT_INVALID_FORMAT)]);
    }

    #[test]
    fn errors_follow_rule_order() {
        let rules = vec![
            FieldRule::required("NOMBRE", FieldKind::Required),
            FieldRule::required("EDAD", FieldKind::BoundedInteger { min: 0, max: 120 }),
        ];
        let index = HeaderIndex::from_header(&row(&["EDAD", "NOMBRE"]));
        let errors = validate_row(&rules, &row(&["abc"]), 2, &index);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].column, "NOMBRE");
        assert_eq!(errors[0].comment, COMMENT_REQUIRED);
        assert_eq!(errors[1].column, "EDAD");
        assert_eq!(errors[1].comment, COMMENT_NOT_INTEGER);
    }
}
