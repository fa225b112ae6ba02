//! Platform types exchanged with cloud providers.
//!
//! These mirror the orchestrator's own object model closely enough to be
//! serialized onto the wire and decoded from provider responses. Providers
//! never interpret them beyond (de)serialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque node identity. Providers call these "instances".
pub type InstanceName = String;

/// Resource name → quantity (e.g. `"cpu" → "4"`, `"memory" → "8Gi"`).
pub type ResourceList = HashMap<String, Quantity>;

/// A resource amount in the platform's quantity notation.
///
/// Kept as text and never interpreted here. Decodes from either a JSON
/// string or a bare number; always encodes as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "QuantityRepr")]
pub struct Quantity(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl From<QuantityRepr> for Quantity {
    fn from(repr: QuantityRepr) -> Self {
        match repr {
            QuantityRepr::Text(s) => Self(s),
            QuantityRepr::Int(n) => Self(n.to_string()),
            QuantityRepr::Uint(n) => Self(n.to_string()),
            QuantityRepr::Float(n) => Self(n.to_string()),
        }
    }
}

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Quantity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Quantity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Quantity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Metadata ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

// ── Pod ───────────────────────────────────────────────────────────

/// A workload awaiting (or holding) a placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub node_selector: HashMap<String, String>,
    /// Node the pod is bound to, empty until scheduled.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub limits: ResourceList,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub requests: ResourceList,
}

impl Pod {
    /// Build a bare pod with just a namespace and name.
    pub fn named(namespace: &str, name: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                ..ObjectMeta::default()
            },
            spec: PodSpec::default(),
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// A schedulable machine as seen by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: NodeSpec,
    #[serde(default)]
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(rename = "externalID", default, skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unschedulable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub capacity: ResourceList,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<NodeAddress>,
}

impl Node {
    /// Build a node carrying only its name.
    pub fn named(name: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.to_string(),
                ..ObjectMeta::default()
            },
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// Ordered collection of nodes. Order is significant and preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub items: Vec<Node>,
}

impl NodeList {
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Node::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// ── Addresses & resources ─────────────────────────────────────────

/// Kind of a node address. Kinds this build does not know are carried
/// through verbatim as [`NodeAddressType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeAddressType {
    Hostname,
    ExternalIp,
    InternalIp,
    LegacyHostIp,
    Other(String),
}

impl NodeAddressType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hostname => "Hostname",
            Self::ExternalIp => "ExternalIP",
            Self::InternalIp => "InternalIP",
            Self::LegacyHostIp => "LegacyHostIP",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NodeAddressType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Hostname" => Self::Hostname,
            "ExternalIP" => Self::ExternalIp,
            "InternalIP" => Self::InternalIp,
            "LegacyHostIP" => Self::LegacyHostIp,
            _ => Self::Other(s),
        }
    }
}

impl From<NodeAddressType> for String {
    fn from(t: NodeAddressType) -> Self {
        match t {
            NodeAddressType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeAddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub address_type: NodeAddressType,
    pub address: String,
}

/// Capacity reported by the provider for a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResources {
    #[serde(default)]
    pub capacity: ResourceList,
}

// ── Scheduling ────────────────────────────────────────────────────

/// Score assigned to a node by a prioritize pass.
///
/// Scores are added to the orchestrator's own score before final
/// selection. Providers only transport them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPriority {
    #[serde(alias = "host")]
    pub node: InstanceName,
    pub score: i64,
}

pub type HostPriorityList = Vec<HostPriority>;

/// Opaque annotations returned by a bind, consumed by later lifecycle
/// stages (network/storage attachment).
pub type BindAnnotations = HashMap<String, String>;
