use serde::{Deserialize, Serialize};

/// Declared type of a leaf input.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Integer,
    Boolean,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InputKind::Text => "text",
            InputKind::Integer => "integer",
            InputKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A leaf input value. Serializes untagged, so the property literal is the
/// plain JSON scalar (`"host"`, `42`, `true`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl InputValue {
    pub fn kind(&self) -> InputKind {
        match self {
            InputValue::Text(_) => InputKind::Text,
            InputValue::Integer(_) => InputKind::Integer,
            InputValue::Boolean(_) => InputKind::Boolean,
        }
    }
}

/// Descriptor for one declared input: name, type, and whether the value is
/// a secret. Secret inputs never reach the plain property store.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
    pub sensitive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kinds() {
        assert_eq!(InputValue::Text("x".into()).kind(), InputKind::Text);
        assert_eq!(InputValue::Integer(7).kind(), InputKind::Integer);
        assert_eq!(InputValue::Boolean(true).kind(), InputKind::Boolean);
    }

    #[test]
    fn untagged_value_literals() {
        assert_eq!(
            serde_json::to_string(&InputValue::Text("host".into())).unwrap(),
            "\"host\""
        );
        assert_eq!(serde_json::to_string(&InputValue::Integer(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&InputValue::Boolean(true)).unwrap(),
            "true"
        );
    }
}
