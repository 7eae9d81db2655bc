use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A versioned configuration set of one type (e.g. `core-site`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub config_type: String,
    pub version_tag: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Config {
    pub fn new(config_type: impl Into<String>, version_tag: impl Into<String>) -> Self {
        Self {
            config_type: config_type.into(),
            version_tag: version_tag.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Stack version installed (or to be installed) for a component, e.g. `HDP-1.2.0`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackVersion(String);

impl StackVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
