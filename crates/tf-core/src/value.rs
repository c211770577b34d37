use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamic value as authored in the project: variable defaults, condition
/// operands, action amounts.
///
/// Authored data is loosely typed (numbers often arrive as strings), so
/// comparisons go through [`Value::as_number`] and [`Value::loose_eq`]
/// rather than structural equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
    /// An ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Numeric coercion. `None` stands for a failed parse.
    ///
    /// Booleans count as 1/0, blank text as 0, and a single-element list as
    /// its element.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => parse_number(s),
            Value::List(items) => match items.as_slice() {
                [] => Some(0.0),
                [only] => only.as_number(),
                _ => None,
            },
        }
    }

    /// Coercing equality, tolerant of string-encoded numbers.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Bool(_), _) | (_, Value::Bool(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Value::Number(n), Value::Text(s)) | (Value::Text(s), Value::Number(n)) => {
                parse_number(s).is_some_and(|parsed| parsed == *n)
            }
            _ => false,
        }
    }

    /// Interpret a raw literal typed by a user: number first, then
    /// `true`/`false`, otherwise the text itself.
    pub fn from_literal(raw: &str) -> Value {
        let trimmed = raw.trim();
        if let Some(n) = parse_number(trimmed).filter(|_| !trimmed.is_empty()) {
            return Value::Number(n);
        }
        match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse text as a number. Blank text is 0; anything that is not a finite
/// decimal literal fails.
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::from(5).as_number(), Some(5.0));
        assert_eq!(Value::from("42").as_number(), Some(42.0));
        assert_eq!(Value::from(" 7.5 ").as_number(), Some(7.5));
        assert_eq!(Value::from("").as_number(), Some(0.0));
        assert_eq!(Value::from(true).as_number(), Some(1.0));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
        assert_eq!(Value::List(vec![]).as_number(), Some(0.0));
        assert_eq!(Value::List(vec![Value::from("3")]).as_number(), Some(3.0));
    }

    #[test]
    fn loose_equality_tolerates_string_numbers() {
        assert!(Value::from(10).loose_eq(&Value::from("10")));
        assert!(Value::from("10").loose_eq(&Value::from(10)));
        assert!(!Value::from(10).loose_eq(&Value::from("ten")));
        assert!(Value::from(true).loose_eq(&Value::from(1)));
        assert!(Value::from(false).loose_eq(&Value::from("0")));
        assert!(Value::from("a").loose_eq(&Value::from("a")));
        assert!(!Value::from("10").loose_eq(&Value::from("10.0")));
    }

    #[test]
    fn literal_parsing_prefers_numbers() {
        assert_eq!(Value::from_literal("12"), Value::Number(12.0));
        assert_eq!(Value::from_literal("true"), Value::Bool(true));
        assert_eq!(Value::from_literal("false"), Value::Bool(false));
        assert_eq!(Value::from_literal("hello"), Value::Text("hello".into()));
    }

    #[test]
    fn untagged_json() {
        let values: Vec<Value> = serde_json::from_str(r#"[1, "x", true, [2]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Number(1.0),
                Value::Text("x".into()),
                Value::Bool(true),
                Value::List(vec![Value::Number(2.0)]),
            ]
        );
    }

    proptest::proptest! {
        #[test]
        fn integer_strings_equal_their_numbers(n in -1_000_000i32..1_000_000) {
            proptest::prop_assert!(Value::from(n).loose_eq(&Value::Text(n.to_string())));
        }

        #[test]
        fn integer_literals_parse_as_numbers(n in -1_000_000i32..1_000_000) {
            proptest::prop_assert_eq!(Value::from_literal(&n.to_string()), Value::from(n));
        }
    }

    #[test]
    fn display_matches_authoring_tool() {
        assert_eq!(Value::from(60).to_string(), "60");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(
            Value::List(vec![Value::from(1), Value::from("b")]).to_string(),
            "1,b"
        );
    }
}
