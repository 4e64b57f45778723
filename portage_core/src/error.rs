// src/error.rs
use crate::keys::ConfigScope;
use crate::shape::InputKind;

/// The config object graph does not match its declared shape contract.
///
/// These are integration errors: a hand-written `FormBlock`/`ConfigBlock`
/// impl disagreeing with itself, or a leaf sequence addressed at a shape
/// that never declared it. They are surfaced immediately and never retried.
#[derive(Debug, thiserror::Error)]
pub enum MalformedConfigError {
    #[error("form '{form}' declares no inputs")]
    EmptyForm { form: String },

    #[error("config declares no form named '{form}'")]
    UnknownForm { form: String },

    #[error("form has no input named '{input}'")]
    UnknownInput { input: String },

    #[error("input '{input}' expects a {expected} value, got {found}")]
    TypeMismatch {
        input: String,
        expected: InputKind,
        found: InputKind,
    },
}

/// A stored value does not match the codec's own encoding grammar.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("schema document rejected: {0}")]
    SchemaDocument(#[from] serde_json::Error),

    #[error("invalid {kind} literal for input '{input}': {source}")]
    ValueLiteral {
        input: String,
        kind: InputKind,
        source: serde_json::Error,
    },

    #[error("credential '{key}' is not valid UTF-8")]
    CredentialEncoding { key: String },
}

/// Top-level error for the configuration codec facade.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Malformed(#[from] MalformedConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("property key collision on '{0}'")]
    KeyCollision(String),

    #[error("{0} is direction-scoped, a direction is required")]
    DirectionRequired(ConfigScope),
}
