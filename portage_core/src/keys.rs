//! Property-key namespace for flattened job configuration.
//!
//! Keys are dot-joined segments under a fixed prefix. Form and input names
//! come from Rust field identifiers and therefore contain no dots, which is
//! what keeps the concatenation injective across scopes and directions.
//! The exact format is an internal convention of this codec version.

use serde::{Deserialize, Serialize};

/// Root of the configuration namespace inside a job's property store.
const PREFIX: &str = "portage.job";

/// Side of a data movement a connector-scoped setting belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    From,
    To,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::From => "from",
            Direction::To => "to",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown direction '{0}'")]
pub struct UnknownDirection(String);

impl std::str::FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from" => Ok(Direction::From),
            "to" => Ok(Direction::To),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// Which configuration slot a config object fills.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfigScope {
    ConnectorConnection,
    ConnectorJob,
    FrameworkConnection,
    FrameworkJob,
}

impl ConfigScope {
    /// Whether keys for this scope embed a direction. FrameworkJob is the
    /// one direction-independent slot: a single instance per job.
    pub fn is_directional(self) -> bool {
        !matches!(self, ConfigScope::FrameworkJob)
    }

    fn segment(self) -> &'static str {
        match self {
            ConfigScope::ConnectorConnection => "connector.connection",
            ConfigScope::ConnectorJob => "connector.job",
            ConfigScope::FrameworkConnection => "framework.connection",
            ConfigScope::FrameworkJob => "framework.job",
        }
    }
}

impl std::fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

/// Key under which a config's presence marker is stored. Direction is
/// embedded only for direction-scoped scopes.
pub fn scope_key(scope: ConfigScope, direction: Option<Direction>) -> String {
    let mut key = format!("{}.{}", PREFIX, scope.segment());
    if let Some(dir) = direction.filter(|_| scope.is_directional()) {
        key.push('.');
        key.push_str(dir.as_str());
    }
    key
}

/// Key for one leaf input of a flattened config.
pub fn input_key(
    scope: ConfigScope,
    direction: Option<Direction>,
    form: &str,
    input: &str,
) -> String {
    format!("{}.{}.{}", scope_key(scope, direction), form, input)
}

/// Key for the serialized connector schema, one per direction.
pub fn schema_key(direction: Direction) -> String {
    format!("{}.schema.{}", PREFIX, direction.as_str())
}
