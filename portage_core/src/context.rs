//! Job context carriers: the plain property store and the credential store
//! a job hands to the codec. Both are owned by the job context; the codec
//! never persists anything of its own and performs no locking.

use std::collections::HashMap;

/// Read side of a job context: string properties plus byte-valued
/// credentials. Credentials have a separate lifecycle and never appear in
/// the property map.
pub trait JobContext {
    fn property(&self, key: &str) -> Option<String>;
    fn credential(&self, key: &str) -> Option<Vec<u8>>;
}

/// Mutable (build-form) job context.
pub trait JobContextMut: JobContext {
    fn set_property(&mut self, key: &str, value: &str);
    fn set_credential(&mut self, key: &str, value: &[u8]);
}

/// Stores a secret string under `key` in the credential store.
///
/// Classification of what is a secret happens in the walker via
/// `InputSpec::sensitive`; this bridge just carries bytes.
pub fn put_secret(ctx: &mut dyn JobContextMut, key: &str, value: &str) {
    ctx.set_credential(key, value.as_bytes());
}

/// Fetches a secret by key; absent on a missing key, never an error.
pub fn get_secret(ctx: &dyn JobContext, key: &str) -> Option<Vec<u8>> {
    ctx.credential(key)
}

/// In-memory build-form context: the mutable representation a job
/// definition is assembled against before launch.
#[derive(Debug, Default)]
pub struct JobDraft {
    properties: HashMap<String, String>,
    credentials: HashMap<String, Vec<u8>>,
}

impl JobDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the draft into its execution-ready read form. The
    /// credential store is carried over unchanged; see the propagation
    /// contract test in `tests/codec_tests.rs`.
    pub fn materialize(&self) -> RunContext {
        RunContext::from(self)
    }

    /// Iterates the plain property map. Test hook: leakage checks scan
    /// every stored value here.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn credential_keys(&self) -> impl Iterator<Item = &str> {
        self.credentials.keys().map(|k| k.as_str())
    }
}

impl JobContext for JobDraft {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn credential(&self, key: &str) -> Option<Vec<u8>> {
        self.credentials.get(key).cloned()
    }
}

impl JobContextMut for JobDraft {
    fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    fn set_credential(&mut self, key: &str, value: &[u8]) {
        self.credentials.insert(key.to_string(), value.to_vec());
    }
}

/// Read-form context: what the execution side sees once a job definition
/// has been materialized.
#[derive(Debug)]
pub struct RunContext {
    properties: HashMap<String, String>,
    credentials: HashMap<String, Vec<u8>>,
}

impl RunContext {
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&JobDraft> for RunContext {
    fn from(draft: &JobDraft) -> Self {
        RunContext {
            properties: draft.properties.clone(),
            credentials: draft.credentials.clone(),
        }
    }
}

impl JobContext for RunContext {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn credential(&self, key: &str) -> Option<Vec<u8>> {
        self.credentials.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_round_trip() {
        let mut draft = JobDraft::new();
        draft.set_property("a.b", "1");
        assert_eq!(draft.property("a.b").as_deref(), Some("1"));
        assert_eq!(draft.property("a.c"), None);
    }

    #[test]
    fn secret_bridge_round_trip() {
        let mut draft = JobDraft::new();
        put_secret(&mut draft, "k", "hunter2");
        assert_eq!(get_secret(&draft, "k").as_deref(), Some("hunter2".as_bytes()));
        assert_eq!(get_secret(&draft, "missing"), None);
    }

    #[test]
    fn secrets_never_touch_properties() {
        let mut draft = JobDraft::new();
        put_secret(&mut draft, "k", "hunter2");
        assert_eq!(draft.properties().count(), 0);
        assert_eq!(draft.credential_keys().count(), 1);
    }

    #[test]
    fn materialize_carries_both_stores() {
        let mut draft = JobDraft::new();
        draft.set_property("p", "v");
        put_secret(&mut draft, "s", "secret");

        let run = draft.materialize();
        assert_eq!(run.property("p").as_deref(), Some("v"));
        assert_eq!(get_secret(&run, "s").as_deref(), Some("secret".as_bytes()));
    }
}
