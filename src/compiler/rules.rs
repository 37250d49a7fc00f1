//! Tier 1: left-to-right token accumulation.
//!
//! Each recognised token either appends a fragment to the expression buffer
//! or replaces the whole buffer. Unrecognised tokens are ignored.
//!
//! | token | rule | effect |
//! | --- | --- | --- |
//! | `name` `age` `address` | field | append `.name` / `.age` / `.address` |
//! | `city` `country` | field | append `.address.city` / `.address.country` |
//! | `first` `last` `all` | mode | replace with `.[] \| first` / `.[] \| last` / `.[]` |
//! | `count` `average` `sum` | mode | replace with `length` / `map(.age) \| add / length` / `map(.age) \| add` |
//! | `filter` `where` | filter | append ` \| select(` (left open) |
//! | `greater` `>` `less` `<` `equal` `=` | comparison | append `>` / `<` / `==` |
//! | `and` `or` | connector | append ` and ` / ` or ` |
//!
//! The filter clause is never closed: condition extraction is not
//! supported, so an expression containing it fails in the evaluator with a
//! syntax error.

use tracing::warn;

/// Fragment appended by `filter` and `where`.
pub const SELECT_OPEN: &str = " | select(";

/// What a recognised token does to the expression buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRule {
    /// Appends a path fragment
    Field(&'static str),
    /// Replaces the whole buffer
    Mode(&'static str),
    /// Appends an unclosed `select(`
    FilterOpen,
    /// Appends a comparison symbol
    Comparison(&'static str),
    /// Appends a logical connector with surrounding spaces
    Connector(&'static str),
}

impl TokenRule {
    /// Classifies one lowercase token.
    pub fn classify(token: &str) -> Option<TokenRule> {
        use TokenRule::*;
        let rule = match token {
            "name" => Field(".name"),
            "age" => Field(".age"),
            "address" => Field(".address"),
            "city" => Field(".address.city"),
            "country" => Field(".address.country"),

            "first" => Mode(".[] | first"),
            "last" => Mode(".[] | last"),
            "all" => Mode(".[]"),
            "count" => Mode("length"),
            "average" => Mode("map(.age) | add / length"),
            "sum" => Mode("map(.age) | add"),

            "filter" | "where" => FilterOpen,

            "greater" | ">" => Comparison(">"),
            "less" | "<" => Comparison("<"),
            "equal" | "=" => Comparison("=="),

            "and" => Connector(" and "),
            "or" => Connector(" or "),

            _ => return None,
        };
        Some(rule)
    }

    /// Applies the rule to the buffer.
    pub fn apply(self, buffer: &mut String) {
        match self {
            TokenRule::Mode(expr) => {
                buffer.clear();
                buffer.push_str(expr);
            }
            TokenRule::FilterOpen => buffer.push_str(SELECT_OPEN),
            TokenRule::Field(fragment)
            | TokenRule::Comparison(fragment)
            | TokenRule::Connector(fragment) => buffer.push_str(fragment),
        }
    }
}

/// Folds every token into one expression buffer, left to right.
pub fn accumulate<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut buffer = String::new();
    let mut open_filters = 0usize;

    for token in tokens {
        let Some(rule) = TokenRule::classify(token.as_ref()) else {
            continue;
        };
        match rule {
            TokenRule::FilterOpen => open_filters += 1,
            TokenRule::Mode(_) => open_filters = 0,
            _ => {}
        }
        rule.apply(&mut buffer);
    }

    if open_filters > 0 {
        warn!(
            expression = %buffer,
            "filter conditions are not supported; select( left unclosed"
        );
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tokens_are_ignored() {
        assert_eq!(accumulate(&["show", "me", "the", "name"]), ".name");
    }

    #[test]
    fn test_mode_discards_fields() {
        assert_eq!(accumulate(&["name", "age", "count"]), "length");
        assert_eq!(accumulate(&["count", "name"]), "length.name");
    }

    #[test]
    fn test_filter_clause_is_left_open() {
        assert_eq!(
            accumulate(&["filter", "where", "age", ">"]),
            " | select( | select(.age>"
        );
    }
}
