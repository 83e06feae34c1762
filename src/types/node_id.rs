// ABOUTME: Deployment target node identifiers.
// ABOUTME: Parses comma-separated node lists into validated node IDs.

use nonempty::NonEmpty;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeIdError {
    #[error("node id cannot be empty")]
    Empty,

    #[error("node id list contains no node ids")]
    EmptyList,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: &str) -> Result<Self, NodeIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(NodeIdError::Empty);
        }

        Ok(Self(value.to_string()))
    }

    /// Parse a comma-separated list of node IDs.
    ///
    /// Tokens are trimmed and empty tokens are skipped, so `"a, b,,c"`
    /// yields three nodes. Order is preserved and duplicates are kept.
    pub fn parse_list(input: &str) -> Result<NonEmpty<NodeId>, NodeIdError> {
        let nodes = input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(NodeId::new)
            .collect::<Result<Vec<_>, _>>()?;

        NonEmpty::from_vec(nodes).ok_or(NodeIdError::EmptyList)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
