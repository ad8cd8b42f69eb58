//! Parser for rule strings such as `"required | between:5,10"`.
//!
//! Grammar:
//!
//! ```text
//! rules := rule ( "|" rule )*
//! rule  := name [ ":" arg ( "," arg )* ]
//! ```
//!
//! Whitespace around names and arguments is trimmed. Only the first `:` of a
//! rule separates the name, so arguments may contain colons. Inside a rule,
//! `\|` and `\,` stand for a literal `|` or `,`.

use crate::error::ConfigurationError;

/// One parsed rule: a validator name plus its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Registered validator name.
    pub name: String,
    /// Arguments after the `:`, trimmed.
    pub args: Vec<String>,
}

/// Splits a rule string into rules.
///
/// A blank rule string yields no rules.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyRule`] when a rule between two `|` is
/// blank.
///
/// # Example
///
/// ```
/// use paramgate_core::parse_rules;
///
/// let rules = parse_rules("required | between:5,10").unwrap();
/// assert_eq!(rules[0].name, "required");
/// assert_eq!(rules[1].args, vec!["5", "10"]);
/// ```
pub fn parse_rules(rules: &str) -> Result<Vec<Rule>, ConfigurationError> {
    if rules.trim().is_empty() {
        return Ok(Vec::new());
    }

    split_unescaped(rules, '|')
        .into_iter()
        .map(|segment| parse_rule(rules, &segment))
        .collect()
}

fn parse_rule(rules: &str, segment: &str) -> Result<Rule, ConfigurationError> {
    let (name, args) = match segment.split_once(':') {
        Some((name, args)) => (
            name.trim(),
            split_unescaped(args, ',')
                .into_iter()
                .map(|arg| arg.trim().to_string())
                .collect(),
        ),
        None => (segment.trim(), Vec::new()),
    };

    if name.is_empty() {
        return Err(ConfigurationError::EmptyRule {
            rules: rules.to_string(),
        });
    }

    Ok(Rule {
        name: name.to_string(),
        args,
    })
}

/// Splits on `sep`, turning `\sep` into a literal `sep`.
///
/// Other backslashes are kept for later stages.
fn split_unescaped(input: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&sep) {
            current.push(sep);
            chars.next();
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[Rule]) -> Vec<&str> {
        rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    #[test]
    fn test_empty_rule_string() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("   ").unwrap().is_empty());
    }

    #[test]
    fn test_trims_names_and_args() {
        let rules = parse_rules(" required |between: 5 , 10 ").unwrap();
        assert_eq!(names(&rules), vec!["required", "between"]);
        assert!(rules[0].args.is_empty());
        assert_eq!(rules[1].args, vec!["5", "10"]);
    }

    #[test]
    fn test_colons_inside_args() {
        let rules = parse_rules(r"regex:^\d{2}:\d{2}$").unwrap();
        assert_eq!(rules[0].name, "regex");
        assert_eq!(rules[0].args, vec![r"^\d{2}:\d{2}$"]);
    }

    #[test]
    fn test_escaped_separators() {
        let rules = parse_rules(r"regex:^(a\|b)$ | in:x\,y,z").unwrap();
        assert_eq!(rules[0].args, vec!["^(a|b)$"]);
        assert_eq!(rules[1].args, vec!["x,y", "z"]);
    }

    #[test]
    fn test_other_backslashes_survive() {
        let rules = parse_rules(r"regex:^\w+$").unwrap();
        assert_eq!(rules[0].args, vec![r"^\w+$"]);
    }

    #[test]
    fn test_empty_segment_is_rejected() {
        assert!(matches!(
            parse_rules("required||min:1"),
            Err(ConfigurationError::EmptyRule { .. })
        ));
        assert!(parse_rules("required|").is_err());
    }
}
