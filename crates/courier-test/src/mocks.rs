//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use courier_config::EnvSource;

/// In-memory environment that records every key it is asked for.
///
/// Clones share the same variables and lookup log, so a clone can be handed
/// to a [`ReleaseContext`](courier_config::ReleaseContext) while the test
/// keeps another to inspect.
///
/// Every method panics if a thread panicked while holding one of the shared
/// locks.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: Arc<Mutex<HashMap<String, String>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockEnv {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a variable.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars().insert(key.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&self, key: &str) {
        self.vars().remove(key);
    }

    /// Keys looked up so far, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookup_log().clone()
    }

    /// Forget recorded lookups.
    pub fn clear_lookups(&self) {
        self.lookup_log().clear();
    }

    /// Share this environment as a trait object.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn EnvSource> {
        Arc::new(self.clone())
    }

    fn vars(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.vars.lock().expect("MockEnv vars lock poisoned")
    }

    fn lookup_log(&self) -> MutexGuard<'_, Vec<String>> {
        self.lookups.lock().expect("MockEnv lookup lock poisoned")
    }
}

impl EnvSource for MockEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.lookup_log().push(key.to_owned());
        self.vars().get(key).cloned()
    }
}
