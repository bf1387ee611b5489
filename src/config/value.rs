//! Leaf values and the literal syntax used by command-line overrides

use std::fmt;

use serde_yaml::Value as YamlValue;

/// Runtime type of a leaf (or subtree) in the configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    /// Fixed-size tuple of floats.
    Tuple(usize),
    Tree,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::Tuple(len) => write!(f, "tuple[float; {len}]"),
            Self::Tree => f.write_str("tree"),
        }
    }
}

/// A leaf value, either read from the store or parsed from an override.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<f64>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Tuple(items) => ValueKind::Tuple(items.len()),
        }
    }

    /// Evaluate `text` as a literal: bool, int, float, quoted string or a
    /// tuple/list of numbers. Anything else is kept as the plain string.
    pub fn parse_literal(text: &str) -> Value {
        literal(text.trim()).unwrap_or_else(|| Value::Str(text.to_string()))
    }

    /// Convert a leaf of a parsed config file.
    ///
    /// On failure returns the name of the YAML type that has no leaf
    /// counterpart, for use in type-mismatch errors.
    pub fn from_yaml(value: &YamlValue) -> Result<Value, String> {
        match value {
            YamlValue::Bool(b) => Ok(Value::Bool(*b)),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_f64() {
                    match n.as_f64() {
                        Some(x) if x.is_finite() => Ok(Value::Float(x)),
                        _ => Err("non-finite float".to_string()),
                    }
                } else {
                    // u64 beyond i64::MAX
                    Err("int".to_string())
                }
            }
            YamlValue::String(s) => Ok(Value::Str(s.clone())),
            YamlValue::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    YamlValue::Number(n) => n.as_f64().filter(|x| x.is_finite()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::Tuple)
                .ok_or_else(|| "sequence".to_string()),
            YamlValue::Null => Err("null".to_string()),
            YamlValue::Mapping(_) => Err(ValueKind::Tree.to_string()),
            YamlValue::Tagged(tagged) => Err(format!("tagged value {}", tagged.tag)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            // A string that is itself quoted gets the other quote kind so
            // stripping one level gives it back unchanged
            Self::Str(s) => match unquote(s).map(|_| s.as_bytes()[0]) {
                Some(b'\'') => write!(f, "\"{s}\""),
                Some(_) => write!(f, "'{s}'"),
                None => f.write_str(s),
            },
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, x) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{x:?}")?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

enum Number {
    Int(i64),
    Float(f64),
}

fn literal(text: &str) -> Option<Value> {
    if let Some(b) = parse_bool(text) {
        return Some(Value::Bool(b));
    }
    if let Some(s) = unquote(text) {
        return Some(Value::Str(s.to_string()));
    }
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        // "(0.5)" is a parenthesised scalar, not a tuple
        if !inner.contains(',') && !inner.trim().is_empty() {
            return literal(inner.trim());
        }
        return parse_sequence(inner).map(Value::Tuple);
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return parse_sequence(inner).map(Value::Tuple);
    }
    match parse_number(text)? {
        Number::Int(i) => Some(Value::Int(i)),
        Number::Float(x) => Some(Value::Float(x)),
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// Strip one level of matching single or double quotes.
pub(crate) fn unquote(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return Some(&text[1..text.len() - 1]);
        }
    }
    None
}

fn parse_number(text: &str) -> Option<Number> {
    let allowed = |b: u8| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E');
    if !text.bytes().all(allowed) || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        // Integer syntax that overflows i64 is not a float
        return text.parse::<i64>().ok().map(Number::Int);
    }
    text.parse::<f64>().ok().filter(|x| x.is_finite()).map(Number::Float)
}

fn parse_sequence(inner: &str) -> Option<Vec<f64>> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    inner
        .split(',')
        .map(|part| match parse_number(part.trim())? {
            Number::Int(i) => Some(i as f64),
            Number::Float(x) => Some(x),
        })
        .collect()
}
