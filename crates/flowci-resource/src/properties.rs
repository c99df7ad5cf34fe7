// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local property table, filled from `-D key=value` flags and config.

use std::collections::BTreeMap;

use flowci_core::FlowError;

/// String key/value properties consulted by the resolver's second source.
///
/// Unlike environment variables these are owned by the caller and passed in
/// explicitly; there is no global table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemProperties {
    values: BTreeMap<String, String>,
}

impl SystemProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Parse a `key=value` definition. The value may be empty; the key may not.
    pub fn parse_define(define: &str) -> Result<(String, String), FlowError> {
        let (key, value) = define.split_once('=').ok_or_else(|| {
            FlowError::InvalidArgument(format!("property definition `{define}` must be key=value"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(FlowError::InvalidArgument(format!(
                "property definition `{define}` has an empty key"
            )));
        }
        Ok((key.to_string(), value.to_string()))
    }

    /// Apply a list of `key=value` definitions; later entries win.
    pub fn apply_defines<I, S>(&mut self, defines: I) -> Result<(), FlowError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for define in defines {
            let (key, value) = Self::parse_define(define.as_ref())?;
            self.values.insert(key, value);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SystemProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for SystemProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.values.insert(k.into(), v.into());
        }
    }
}
