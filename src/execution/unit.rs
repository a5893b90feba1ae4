//! Command specs as configured, and the units they expand into

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured hook entry: one command, or commands that must run in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Single(String),
    Sequence(Vec<String>),
}

impl CommandSpec {
    /// Number of units this spec expands into
    pub fn unit_count(&self) -> usize {
        match self {
            CommandSpec::Single(_) => 1,
            CommandSpec::Sequence(commands) => commands.len(),
        }
    }

    /// Expand into units addressed at `top_level_index`
    pub fn units(&self, top_level_index: usize) -> Vec<CommandUnit> {
        match self {
            CommandSpec::Single(command) => vec![CommandUnit::single(command, top_level_index)],
            CommandSpec::Sequence(commands) => commands
                .iter()
                .enumerate()
                .map(|(sub_index, command)| {
                    CommandUnit::member(command, top_level_index, sub_index, commands.len())
                })
                .collect(),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(command: &str) -> Self {
        CommandSpec::Single(command.to_string())
    }
}

impl From<Vec<&str>> for CommandSpec {
    fn from(commands: Vec<&str>) -> Self {
        CommandSpec::Sequence(commands.into_iter().map(String::from).collect())
    }
}

/// The command that actually gets invoked, plus where it sits in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandUnit {
    pub command: String,
    pub top_level_index: usize,
    pub sub_index: Option<usize>,
    pub sub_sequence_length: Option<usize>,
}

impl CommandUnit {
    pub fn single(command: &str, top_level_index: usize) -> Self {
        Self {
            command: command.to_string(),
            top_level_index,
            sub_index: None,
            sub_sequence_length: None,
        }
    }

    pub fn member(command: &str, top_level_index: usize, sub_index: usize, length: usize) -> Self {
        Self {
            command: command.to_string(),
            top_level_index,
            sub_index: Some(sub_index),
            sub_sequence_length: Some(length),
        }
    }

    /// Key used to restore configuration order after a parallel run
    pub fn order_key(&self) -> (usize, usize) {
        (self.top_level_index, self.sub_index.unwrap_or(0))
    }

    /// Human readable position, `3/5`, or `2/5 1/3` for sub-sequence members
    pub fn position(&self, total_top_level: usize) -> String {
        match (self.sub_index, self.sub_sequence_length) {
            (Some(sub), Some(len)) => format!(
                "{}/{} {}/{}",
                self.top_level_index + 1,
                total_top_level,
                sub + 1,
                len
            ),
            _ => format!("{}/{}", self.top_level_index + 1, total_top_level),
        }
    }
}

impl fmt::Display for CommandUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Expand specs into units, in configuration order
pub fn expand(specs: &[CommandSpec]) -> Vec<CommandUnit> {
    specs
        .iter()
        .enumerate()
        .flat_map(|(index, spec)| spec.units(index))
        .collect()
}

/// Total number of units a spec list expands into
pub fn total_units(specs: &[CommandSpec]) -> usize {
    specs.iter().map(CommandSpec::unit_count).sum()
}
