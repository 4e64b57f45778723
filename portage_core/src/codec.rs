//! Configuration codec facade: flattens config objects and schemas into a
//! job context's property and credential stores, and reconstructs them on
//! the execution side.
//!
//! One generic code path handles every scope/direction combination; the
//! named per-scope functions are thin wrappers kept for call-site clarity.
//! The facade holds no state and does no locking: the owner of the job
//! context serializes access.

use std::collections::HashSet;

use tracing::debug;

use crate::context::{get_secret, put_secret, JobContext, JobContextMut};
use crate::error::{CodecError, DecodeError};
use crate::keys::{input_key, schema_key, scope_key, ConfigScope, Direction};
use crate::schema::{self, Schema};
use crate::shape::{InputKind, InputSpec, InputValue};
use crate::walker::{absorb, leaves, Leaf};
use crate::ConfigBlock;

/// Presence-marker literal for "explicitly no config".
const NO_CONFIG: &str = "null";
/// Presence-marker literal for "config stored".
const PRESENT: &str = "config";

/// Flattens `config` into `ctx` under the given scope. Passing `None`
/// stores an explicit no-config state that reads back as `None`.
///
/// Sensitive leaves go to the credential store, everything else to the
/// property store. The leaf sequence is staged and validated before the
/// first store write, so a malformed config never leaves a partial result.
pub fn set_config(
    scope: ConfigScope,
    direction: Option<Direction>,
    ctx: &mut dyn JobContextMut,
    config: Option<&dyn ConfigBlock>,
) -> Result<(), CodecError> {
    let direction = resolve_direction(scope, direction)?;
    let marker = scope_key(scope, direction);

    let config = match config {
        Some(config) => config,
        None => {
            debug!(%scope, ?direction, "storing explicit no-config state");
            ctx.set_property(&marker, NO_CONFIG);
            return Ok(());
        }
    };

    let mut staged: Vec<(String, String, bool)> = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(marker.clone());

    for item in leaves(config) {
        let leaf = item?;
        let key = input_key(scope, direction, leaf.form, leaf.input.name);
        if !seen.insert(key.clone()) {
            return Err(CodecError::KeyCollision(key));
        }
        let literal = encode_value(&leaf)?;
        staged.push((key, literal, leaf.input.sensitive));
    }

    ctx.set_property(&marker, PRESENT);
    for (key, literal, sensitive) in &staged {
        if *sensitive {
            put_secret(ctx, key, literal);
        } else {
            ctx.set_property(key, literal);
        }
    }

    debug!(%scope, ?direction, leaves = staged.len(), "stored config");
    Ok(())
}

/// Reconstructs a config of shape `C` from `ctx`. Returns `None` when the
/// scope was never set or was explicitly set to no config.
pub fn get_config<C>(
    scope: ConfigScope,
    direction: Option<Direction>,
    ctx: &dyn JobContext,
) -> Result<Option<C>, CodecError>
where
    C: ConfigBlock + Default,
{
    let direction = resolve_direction(scope, direction)?;
    let marker = scope_key(scope, direction);

    match ctx.property(&marker) {
        None => return Ok(None),
        Some(state) if state == NO_CONFIG => return Ok(None),
        Some(_) => {}
    }

    let mut target = C::default();

    let mut shape = Vec::new();
    for item in leaves(&target) {
        shape.push(item?);
    }

    let mut filled = Vec::with_capacity(shape.len());
    for leaf in shape {
        let key = input_key(scope, direction, leaf.form, leaf.input.name);
        let literal = if leaf.input.sensitive {
            match get_secret(ctx, &key) {
                None => None,
                Some(bytes) => Some(String::from_utf8(bytes).map_err(|_| {
                    DecodeError::CredentialEncoding { key: key.clone() }
                })?),
            }
        } else {
            ctx.property(&key)
        };
        let value = match literal {
            None => None,
            Some(literal) => decode_value(&leaf.input, &literal)?,
        };
        filled.push(Leaf { value, ..leaf });
    }

    absorb(&mut target, filled)?;
    debug!(%scope, ?direction, "loaded config");
    Ok(Some(target))
}

pub fn set_connector_connection_config(
    direction: Direction,
    ctx: &mut dyn JobContextMut,
    config: Option<&dyn ConfigBlock>,
) -> Result<(), CodecError> {
    set_config(ConfigScope::ConnectorConnection, Some(direction), ctx, config)
}

pub fn get_connector_connection_config<C: ConfigBlock + Default>(
    direction: Direction,
    ctx: &dyn JobContext,
) -> Result<Option<C>, CodecError> {
    get_config(ConfigScope::ConnectorConnection, Some(direction), ctx)
}

pub fn set_connector_job_config(
    direction: Direction,
    ctx: &mut dyn JobContextMut,
    config: Option<&dyn ConfigBlock>,
) -> Result<(), CodecError> {
    set_config(ConfigScope::ConnectorJob, Some(direction), ctx, config)
}

pub fn get_connector_job_config<C: ConfigBlock + Default>(
    direction: Direction,
    ctx: &dyn JobContext,
) -> Result<Option<C>, CodecError> {
    get_config(ConfigScope::ConnectorJob, Some(direction), ctx)
}

pub fn set_framework_connection_config(
    direction: Direction,
    ctx: &mut dyn JobContextMut,
    config: Option<&dyn ConfigBlock>,
) -> Result<(), CodecError> {
    set_config(ConfigScope::FrameworkConnection, Some(direction), ctx, config)
}

pub fn get_framework_connection_config<C: ConfigBlock + Default>(
    direction: Direction,
    ctx: &dyn JobContext,
) -> Result<Option<C>, CodecError> {
    get_config(ConfigScope::FrameworkConnection, Some(direction), ctx)
}

/// Framework job config is direction-independent: one instance per job.
pub fn set_framework_job_config(
    ctx: &mut dyn JobContextMut,
    config: Option<&dyn ConfigBlock>,
) -> Result<(), CodecError> {
    set_config(ConfigScope::FrameworkJob, None, ctx, config)
}

pub fn get_framework_job_config<C: ConfigBlock + Default>(
    ctx: &dyn JobContext,
) -> Result<Option<C>, CodecError> {
    get_config(ConfigScope::FrameworkJob, None, ctx)
}

/// Stores the connector schema for one direction. `None` stores an absence
/// marker so the paired get returns `None` instead of a zero-value schema.
pub fn set_connector_schema(
    direction: Direction,
    ctx: &mut dyn JobContextMut,
    schema: Option<&Schema>,
) -> Result<(), CodecError> {
    let document = schema::encode(schema)?;
    ctx.set_property(&schema_key(direction), &document);
    debug!(%direction, "stored connector schema");
    Ok(())
}

pub fn get_connector_schema(
    direction: Direction,
    ctx: &dyn JobContext,
) -> Result<Option<Schema>, CodecError> {
    match ctx.property(&schema_key(direction)) {
        None => Ok(None),
        Some(document) => Ok(schema::decode(&document)?),
    }
}

fn resolve_direction(
    scope: ConfigScope,
    direction: Option<Direction>,
) -> Result<Option<Direction>, CodecError> {
    if scope.is_directional() {
        direction
            .map(Some)
            .ok_or(CodecError::DirectionRequired(scope))
    } else {
        // FrameworkJob is direction-independent; a stray direction from the
        // generic path is dropped rather than rejected.
        Ok(None)
    }
}

fn encode_value(leaf: &Leaf) -> Result<String, CodecError> {
    serde_json::to_string(&leaf.value).map_err(|source| {
        CodecError::Decode(DecodeError::ValueLiteral {
            input: leaf.input.name.to_string(),
            kind: leaf.input.kind,
            source,
        })
    })
}

fn decode_value(spec: &InputSpec, literal: &str) -> Result<Option<InputValue>, DecodeError> {
    let parsed = match spec.kind {
        InputKind::Text => {
            serde_json::from_str::<Option<String>>(literal).map(|v| v.map(InputValue::Text))
        }
        InputKind::Integer => {
            serde_json::from_str::<Option<i64>>(literal).map(|v| v.map(InputValue::Integer))
        }
        InputKind::Boolean => {
            serde_json::from_str::<Option<bool>>(literal).map(|v| v.map(InputValue::Boolean))
        }
    };
    parsed.map_err(|source| DecodeError::ValueLiteral {
        input: spec.name.to_string(),
        kind: spec.kind,
        source,
    })
}
