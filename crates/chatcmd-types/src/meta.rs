//! Command metadata supplied by the registration phase.

use serde::{Deserialize, Serialize};

/// One usage line of a command: `!play <url>  Plays the url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub syntax: String,
    pub help: String,
}

impl Usage {
    pub fn new(syntax: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            syntax: syntax.into(),
            help: help.into(),
        }
    }
}

/// What the registration phase knows about a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMeta {
    /// Space separated invoke path, e.g. `"list add"`.
    pub path: String,
    /// Rights tag checked one layer above the kernel, e.g. `"cmd.list.add"`.
    pub rights: String,
    /// Short description shown by `help`.
    #[serde(default)]
    pub description: Option<String>,
    /// Usage lines shown by `help`.
    #[serde(default)]
    pub usage: Vec<Usage>,
}

impl CommandMeta {
    /// Metadata for `path` with the default rights tag `cmd.<path with dots>`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let rights = format!("cmd.{}", path.split(' ').collect::<Vec<_>>().join("."));
        Self {
            path,
            rights,
            description: None,
            usage: Vec::new(),
        }
    }

    /// Builder: set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: add a usage line.
    pub fn usage(mut self, syntax: impl Into<String>, help: impl Into<String>) -> Self {
        self.usage.push(Usage::new(syntax, help));
        self
    }

    /// Builder: override the rights tag.
    pub fn rights(mut self, rights: impl Into<String>) -> Self {
        self.rights = rights.into();
        self
    }
}
