//! Typed field rules applied by the row validator.
//!
//! Every rule except [`Rule::Required`] only looks at non-blank values, so an
//! empty optional field is always accepted and an empty required field yields
//! exactly one violation.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Tokens accepted for boolean fields, compared case-insensitively.
pub const BOOLEAN_TOKENS: &[&str] = &["true", "false", "yes", "no", "1", "0"];

const TRUE_TOKENS: &[&str] = &["true", "yes", "1"];

/// Named value shapes a field can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// A simple `local@domain.tld` shape.
    Email,
}

impl Pattern {
    pub fn is_match(self, value: &str) -> bool {
        match self {
            Pattern::Email => EMAIL_RE.is_match(value),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Pattern::Email => "a valid email address",
        }
    }
}

/// How an enumerated value is compared with its allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    /// `yes` matches `Yes`; the allowed spelling is what gets stored.
    Insensitive,
    Sensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    Pattern(Pattern),
    OneOf {
        allowed: &'static [&'static str],
        case: CaseMode,
    },
    /// A non-negative whole number.
    Integer,
}

impl Rule {
    /// Checks `value` (already trimmed) and returns the violation message, if any.
    pub fn check(&self, field: &str, value: &str) -> Option<String> {
        if value.is_empty() {
            return match self {
                Rule::Required => Some(format!("{} is required", field)),
                _ => None,
            };
        }

        match *self {
            Rule::Required => None,
            Rule::MinLength(min) if value.chars().count() < min => Some(format!(
                "{} must be at least {} characters long",
                field, min
            )),
            Rule::MinLength(_) => None,
            Rule::Pattern(pattern) if !pattern.is_match(value) => {
                Some(format!("{} must be {}", field, pattern.describe()))
            }
            Rule::Pattern(_) => None,
            Rule::OneOf { allowed, case } => match canonical(allowed, case, value) {
                Some(_) => None,
                None => Some(format!(
                    "{} must be one of: {} (got '{}')",
                    field,
                    allowed.join(", "),
                    value
                )),
            },
            Rule::Integer if value.parse::<u32>().is_err() => {
                Some(format!("{} must be a whole number (got '{}')", field, value))
            }
            Rule::Integer => None,
        }
    }
}

/// Returns the allowed spelling matching `value`, if any.
pub fn canonical(
    allowed: &'static [&'static str],
    case: CaseMode,
    value: &str,
) -> Option<&'static str> {
    allowed.iter().copied().find(|candidate| match case {
        CaseMode::Insensitive => candidate.eq_ignore_ascii_case(value),
        CaseMode::Sensitive => *candidate == value,
    })
}

/// Coerces a boolean token; `None` for blank or unknown tokens.
pub fn parse_flag(value: &str) -> Option<bool> {
    let token = canonical(BOOLEAN_TOKENS, CaseMode::Insensitive, value.trim())?;
    Some(TRUE_TOKENS.contains(&token))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: Rule = Rule::OneOf {
        allowed: &["A", "B", "C"],
        case: CaseMode::Insensitive,
    };

    #[test]
    fn blank_values_only_violate_required() {
        assert!(Rule::Required.check("name", "").is_some());
        assert!(Rule::MinLength(6).check("password", "").is_none());
        assert!(Rule::Pattern(Pattern::Email).check("email", "").is_none());
        assert!(TIERS.check("riskTier", "").is_none());
        assert!(Rule::Integer.check("days", "").is_none());
    }

    #[test]
    fn min_length_counts_characters() {
        assert!(Rule::MinLength(6).check("password", "abc").is_some());
        assert!(Rule::MinLength(6).check("password", "ññññññ").is_none());
    }

    #[test]
    fn email_pattern() {
        let rule = Rule::Pattern(Pattern::Email);
        assert!(rule.check("email", "john@example.com").is_none());
        assert!(rule.check("email", "john@example").is_some());
        assert!(rule.check("email", "john doe@example.com").is_some());
    }

    #[test]
    fn enumerations_respect_case_mode() {
        assert!(TIERS.check("riskTier", "b").is_none());
        let message = TIERS.check("riskTier", "D").unwrap();
        assert!(message.contains("riskTier"));
        assert!(message.contains("'D'"));

        let models = Rule::OneOf {
            allowed: &["PO", "LTA", "Subscription"],
            case: CaseMode::Sensitive,
        };
        assert!(models.check("contractModel", "LTA").is_none());
        assert!(models.check("contractModel", "lta").is_some());
    }

    #[test]
    fn integers() {
        assert!(Rule::Integer.check("days", "30").is_none());
        assert!(Rule::Integer.check("days", "-1").is_some());
        assert!(Rule::Integer.check("days", "thirty").is_some());
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("False"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
