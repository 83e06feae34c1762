// ABOUTME: Phantom-typed identifiers for registry resources.
// ABOUTME: Prevents accidental swapping of package and deployment IDs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum PackageMarker {}
pub enum DeploymentMarker {}

/// The registry hands out either numeric or string identifiers.
/// The original representation is kept so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// A type-safe identifier that prevents accidental mixing of different ID types.
///
/// Using phantom types, this ensures you can't pass a `DeploymentId`
/// where a `PackageId` is expected, catching bugs at compile time.
#[must_use = "IDs reference registry resources and should not be ignored"]
pub struct Id<T> {
    value: RawId,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: RawId::Text(value.into()),
            _marker: PhantomData,
        }
    }

    pub fn from_number(value: u64) -> Self {
        Self {
            value: RawId::Number(value),
            _marker: PhantomData,
        }
    }

    /// Numeric value, if the registry issued a numeric ID.
    pub fn as_number(&self) -> Option<u64> {
        match self.value {
            RawId::Number(n) => Some(n),
            RawId::Text(_) => None,
        }
    }

    /// JSON form of the ID, as it would appear in a request body.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.value {
            RawId::Number(n) => serde_json::Value::from(*n),
            RawId::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

// Manual trait implementations that don't require T to implement the trait.
// This is necessary because T is only used as a phantom type marker.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = RawId::deserialize(deserializer)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }
}

pub type PackageId = Id<PackageMarker>;
pub type DeploymentId = Id<DeploymentMarker>;
