// src/lib.rs
pub mod codec;
pub mod context;
pub mod error;
pub mod keys;
pub mod schema;
pub mod shape;
pub mod walker;

// Re-export the working vocabulary so call sites can depend on the crate
// root alone.
pub use crate::context::{JobContext, JobContextMut, JobDraft, RunContext};
pub use crate::error::{CodecError, DecodeError, MalformedConfigError};
pub use crate::keys::{ConfigScope, Direction};
pub use crate::schema::{Column, ColumnKind, Schema};
pub use crate::shape::{InputKind, InputSpec, InputValue};

// Derive macros for the two traits below, serde-style: the macro and the
// trait share a name and are imported together.
pub use configblock_derive::{ConfigBlock, FormBlock};

/// A named sub-group of related leaf inputs within a config object.
///
/// This is the "describe yourself" half of the shape contract: the codec
/// never hardcodes a shape, it asks the object. Usually derived via
/// `#[derive(FormBlock)]`, with `#[sensitive]` marking secret inputs.
pub trait FormBlock {
    /// Declared inputs, in declaration order.
    fn inputs(&self) -> &'static [InputSpec];

    /// Current value of the named input.
    fn input_value(&self, input: &str) -> Result<Option<InputValue>, MalformedConfigError>;

    /// Assigns the named input. `None` resets the leaf to null; a value of
    /// the wrong kind is a type mismatch.
    fn set_input(
        &mut self,
        input: &str,
        value: Option<InputValue>,
    ) -> Result<(), MalformedConfigError>;
}

/// A configuration root: one config object filling one [`ConfigScope`]
/// slot, owning its named forms. Usually derived via
/// `#[derive(ConfigBlock)]`.
pub trait ConfigBlock {
    fn forms(&self) -> Vec<(&'static str, &dyn FormBlock)>;

    fn forms_mut(&mut self) -> Vec<(&'static str, &mut dyn FormBlock)>;
}
