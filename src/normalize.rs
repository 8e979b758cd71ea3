//! Text normalization for scraped box-office cells.
//!
//! Two modes are provided:
//!
//! * [`parse_currency`] extracts every number from a cell and keeps the
//!   highest one. Ranges such as `₹1,968–2,200 crore` resolve to the upper
//!   bound. The result is a tagged [`Amount`] so callers can tell an
//!   unparseable cell apart from a real value; [`clean_currency`] gives the
//!   flat `0.0`-sentinel view.
//! * [`canonical_usd`] rewrites a dollar cell into `$<digits-with-commas>`
//!   without ever converting it to a number.
//!
//! Neither mode returns an error. Bad input degrades to
//! [`Amount::Unparseable`] or to the bare string `$`.

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("citation pattern is valid"));

// ASCII digits only, the same rule `canonical_usd` and `parse_display_amount` use.
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9,]+\.?[0-9]*").expect("number pattern is valid"));

/// Result of numeric extraction from a money cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Value(f64),
    Unparseable,
}

impl Amount {
    /// Sentinel view: unparseable cells read as `0.0`.
    pub fn value(self) -> f64 {
        match self {
            Amount::Value(v) => v,
            Amount::Unparseable => 0.0,
        }
    }

    /// Whether a row carrying this amount may be emitted. A scraped zero is
    /// dropped just like an unparseable cell.
    pub fn is_usable(self) -> bool {
        matches!(self, Amount::Value(v) if v != 0.0)
    }
}

/// Remove every bracketed annotation such as `[1]` or `[nb 2]`.
pub fn strip_citations(text: &str) -> String {
    CITATION_RE.replace_all(text, "").into_owned()
}

/// Citation-free, trimmed text for title, year and rank cells.
pub fn clean_text(text: &str) -> String {
    strip_citations(text).trim().to_string()
}

/// Extract the highest number found in `text`.
///
/// Each match of digits-and-commas (optionally followed by a decimal part)
/// is stripped of its commas and parsed. Matches that fail to parse, such as
/// a lone comma, are ignored.
pub fn parse_currency(text: &str) -> Amount {
    let cleaned = strip_citations(text);

    NUMBER_RE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .fold(Amount::Unparseable, |best, n| match best {
            Amount::Value(b) if b >= n => best,
            _ => Amount::Value(n),
        })
}

/// Same as [`parse_currency`] for a cell that may be missing entirely.
pub fn parse_currency_cell(cell: Option<&str>) -> Amount {
    cell.map(parse_currency).unwrap_or(Amount::Unparseable)
}

/// Sentinel form of [`parse_currency`]: `0.0` when nothing could be parsed.
pub fn clean_currency(text: &str) -> f64 {
    parse_currency(text).value()
}

/// Rewrite a dollar cell as `$<digits-with-commas>`.
///
/// Country prefixes (`NZ$`, `T$`) and unit words are dropped along with every
/// other letter. A cell with no digits comes back as `$`.
pub fn canonical_usd(text: &str) -> String {
    let without_letters: String = strip_citations(text)
        .chars()
        .filter(|c| !c.is_ascii_alphabetic())
        .collect();

    let mut gross = strip_citations(&without_letters).trim().to_string();
    if !gross.contains('$') {
        gross.insert(0, '$');
    }

    let gross: String = gross
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '$' || *c == ',')
        .collect();

    if gross.starts_with('$') && gross.matches('$').count() == 1 {
        gross
    } else {
        let digits: String = gross.chars().filter(|c| *c != '$').collect();
        format!("${}", digits)
    }
}

/// Whether a display amount parses to a non-zero number. `$`, `$0` and
/// `$0,000` do not.
pub fn is_nonzero_display_amount(text: &str) -> bool {
    parse_display_amount(text).is_some_and(|v| v != 0.0)
}

/// Parse a display amount like `$2,923,706,026` back into a number.
pub fn parse_display_amount(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_takes_high_estimate() {
        assert_eq!(clean_currency("₹1,968–2,200 crore"), 2200.0);
        assert_eq!(clean_currency("₹2,200–1,968 crore"), 2200.0);
        assert_eq!(clean_currency("₹1,000-1,500 crore"), 1500.0);
    }

    #[test]
    fn test_no_digits_is_zero() {
        assert_eq!(clean_currency("N/A"), 0.0);
        assert_eq!(clean_currency(""), 0.0);
        assert_eq!(clean_currency("crore"), 0.0);
        assert_eq!(parse_currency("TBA"), Amount::Unparseable);
    }

    #[test]
    fn test_commas_are_thousands_separators() {
        assert_eq!(clean_currency("2000"), 2000.0);
        assert_eq!(clean_currency("2,000"), 2000.0);
        assert_eq!(clean_currency("1968.03"), 1968.03);
        assert_eq!(clean_currency("₹1,234.5 crore"), 1234.5);
    }

    #[test]
    fn test_trailing_decimal_point() {
        assert_eq!(clean_currency("₹1968. crore"), 1968.0);
    }

    #[test]
    fn test_lone_commas_are_ignored() {
        assert_eq!(clean_currency("₹1,000 crore, estimated"), 1000.0);
        assert_eq!(parse_currency(", ,"), Amount::Unparseable);
    }

    #[test]
    fn test_citations_do_not_change_results() {
        assert_eq!(
            clean_currency("₹2,000 crore[3]"),
            clean_currency("₹2,000 crore")
        );
        assert_eq!(clean_currency("[12]₹2,000 crore"), 2000.0);
        assert_eq!(
            canonical_usd("T$2,257,844,554[1]"),
            canonical_usd("T$2,257,844,554")
        );
        assert_eq!(canonical_usd("[nb 1]$1,000"), "$1,000");
    }

    #[test]
    fn test_missing_cell_is_unparseable() {
        assert_eq!(parse_currency_cell(None), Amount::Unparseable);
        assert_eq!(parse_currency_cell(Some("₹5 crore")), Amount::Value(5.0));
    }

    #[test]
    fn test_zero_amount_is_not_usable() {
        assert!(!Amount::Value(0.0).is_usable());
        assert!(!Amount::Unparseable.is_usable());
        assert!(Amount::Value(12.5).is_usable());
        assert_eq!(parse_currency("0 crore"), Amount::Value(0.0));
        assert_eq!(Amount::Unparseable.value(), 0.0);
    }

    #[test]
    fn test_canonical_usd_country_prefixes() {
        assert_eq!(canonical_usd("NZ$2,215,000,000"), "$2,215,000,000");
        assert_eq!(canonical_usd("T$2,257,844,554[1]"), "$2,257,844,554");
        assert_eq!(canonical_usd("F$1,500,000"), "$1,500,000");
    }

    #[test]
    fn test_canonical_usd_adds_symbol() {
        assert_eq!(canonical_usd("2,000,000"), "$2,000,000");
        assert_eq!(canonical_usd("  2,000,000  "), "$2,000,000");
    }

    #[test]
    fn test_canonical_usd_moves_symbol_to_front() {
        assert_eq!(canonical_usd("2,000$"), "$2,000");
        assert_eq!(canonical_usd("1,000$2"), "$1,0002");
        assert_eq!(canonical_usd("$$1,000"), "$1,000");
        assert_eq!(canonical_usd("$1,000 (est.)"), "$1,000");
    }

    #[test]
    fn test_canonical_usd_shape() {
        let inputs = [
            "NZ$2,215,000,000",
            "₹ 2,000 crore",
            "US$ 1.5 billion",
            "~ $1,234 [a]",
            "9",
            "€2,000$",
        ];
        for input in inputs {
            let out = canonical_usd(input);
            assert!(out.starts_with('$'), "{input} -> {out}");
            assert_eq!(out.matches('$').count(), 1, "{input} -> {out}");
            assert!(
                out[1..].chars().all(|c| c.is_ascii_digit() || c == ','),
                "{input} -> {out}"
            );
        }
    }

    #[test]
    fn test_canonical_usd_without_digits_degenerates() {
        assert_eq!(canonical_usd(""), "$");
        assert_eq!(canonical_usd("unknown"), "$");
    }

    #[test]
    fn test_clean_text_strips_markers() {
        assert_eq!(clean_text("Avatar[1]"), "Avatar");
        assert_eq!(clean_text("2009[a][b] "), "2009");
        assert_eq!(clean_text("Titanic"), "Titanic");
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(parse_currency("₹२,२०० crore"), Amount::Unparseable);
        assert_eq!(canonical_usd("२,२००"), "$,");
        // Non-ASCII digits split a token instead of poisoning it
        assert_eq!(parse_currency("1२3"), Amount::Value(3.0));
        assert_eq!(parse_currency("₹1,200२ crore"), Amount::Value(1200.0));
    }

    #[test]
    fn test_nonzero_display_amount() {
        assert!(is_nonzero_display_amount("$2,923,706,026"));
        assert!(!is_nonzero_display_amount("$0"));
        assert!(!is_nonzero_display_amount("$0,000"));
        assert!(!is_nonzero_display_amount("$"));
        assert!(!is_nonzero_display_amount("$,"));
    }

    #[test]
    fn test_parse_display_amount() {
        assert_eq!(parse_display_amount("$2,923,706,026"), Some(2_923_706_026.0));
        assert_eq!(parse_display_amount("$"), None);
        assert_eq!(parse_display_amount("abc"), None);
    }
}
