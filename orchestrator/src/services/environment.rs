//! Environment implementations
//!
//! `ProcessEnvironment` reads and writes the real process environment, which
//! every spawned child inherits. `MemoryEnvironment` is a plain map used where
//! the process environment must stay untouched.

use std::collections::HashMap;

use crate::traits::Environment;

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: environment preparation runs at the very start of setup on a
        // current-thread runtime, before any other thread reads the environment.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// In-memory environment map
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnvironment {
    vars: HashMap<String, String>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Environment for MemoryEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}
