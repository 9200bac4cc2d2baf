//! Node types for the labeled-property graph.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::store::StoreError;

/// Store-assigned handle for a node. Opaque outside the graph layer;
/// domain entities carry their own uuid `id` property.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Labels for the node kinds the engine stores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Label {
    /// A registered user.
    User,
    /// A group of users.
    Usergroup,
    /// A quest posted under a group.
    Quest,
    /// One typed line item of a quest's virtual reward.
    RewardLine,
}

impl Label {
    /// Get the display name for this label.
    pub fn name(&self) -> &'static str {
        match self {
            Label::User => "User",
            Label::Usergroup => "Usergroup",
            Label::Quest => "Quest",
            Label::RewardLine => "RewardLine",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Property bag attached to a node.
pub type Properties = serde_json::Map<String, Value>;

/// A labeled node with its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Store-assigned handle.
    pub id: NodeId,
    /// What kind of node this is.
    pub label: Label,
    /// The node's properties.
    pub properties: Properties,
}

impl Node {
    /// Decode this node's properties into a typed entity.
    ///
    /// Entities are only ever read through this boundary; use sites never
    /// poke at raw property keys.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.properties.clone()))
            .map_err(|e| StoreError::Malformed {
                node: self.id,
                label: self.label,
                reason: e.to_string(),
            })
    }

    /// Read a single property value, if present.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Encode a typed entity into a node property bag.
pub fn encode<T: Serialize>(entity: &T) -> Result<Properties, StoreError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Unavailable(format!(
            "entity serialized to non-object JSON ({other})"
        ))),
        Err(e) => Err(StoreError::Unavailable(e.to_string())),
    }
}
