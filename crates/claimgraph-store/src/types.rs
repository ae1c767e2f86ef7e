//! Node, edge and graph-document types.

use serde::{Deserialize, Serialize};

/// Node identifier as it appears in graph documents.
pub type NodeId = String;

/// Kind of a node in a fact-checking graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The statement being fact-checked. Exactly one per graph.
    Claim,
    /// A source judged to support or refute the claim.
    Document,
    /// A rationale passage extracted from a document.
    Evidence,
    Author,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Claim => write!(f, "claim"),
            Self::Document => write!(f, "document"),
            Self::Evidence => write!(f, "evidence"),
            Self::Author => write!(f, "author"),
        }
    }
}

/// Relation carried by an edge.
///
/// Only `Supports` and `Refutes` have a polarity; the other labels connect
/// nodes without pushing belief in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLabel {
    #[serde(alias = "true", alias = "SUPPORT")]
    Supports,
    #[serde(alias = "false", alias = "CONTRADICT")]
    Refutes,
    Reference,
    #[serde(alias = "author")]
    AuthorOf,
    /// Document to one of its evidence passages.
    #[serde(alias = "evidence")]
    Rationale,
}

impl EdgeLabel {
    /// Sign applied to the edge weight in a signed adjacency matrix.
    pub fn polarity(self) -> Option<f64> {
        match self {
            Self::Supports => Some(1.0),
            Self::Refutes => Some(-1.0),
            Self::Reference | Self::AuthorOf | Self::Rationale => None,
        }
    }

    pub fn is_polar(self) -> bool {
        self.polarity().is_some()
    }
}

/// A node of the graph model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Current belief/importance; mutated by propagation.
    pub score: f64,
    /// Baseline score, never mutated after construction.
    #[serde(rename = "rawScore")]
    pub raw_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, score: f64) -> Self {
        Self {
            id: id.into(),
            node_type,
            score,
            raw_score: score,
            text: None,
        }
    }
}

/// An undirected, labelled, weighted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: EdgeLabel,
    /// Confidence in `[0, 1]`; the sign of a contribution comes from `label`.
    pub weight: f64,
    #[serde(rename = "sentenceProb", skip_serializing_if = "Option::is_none")]
    pub sentence_prob: Option<f64>,
    #[serde(default)]
    pub bidirectional: bool,
}

impl Edge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        label: EdgeLabel,
        weight: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label,
            weight,
            sentence_prob: None,
            bidirectional: false,
        }
    }
}

/// A node as it appears in a graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(alias = "score", default)]
    pub size: f64,
    #[serde(rename = "sizeRaw", alias = "rawScore", default)]
    pub size_raw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A link as it appears in a graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLink {
    pub source: NodeId,
    pub target: NodeId,
    pub label: EdgeLabel,
    #[serde(alias = "weight")]
    pub width: f64,
    #[serde(rename = "sentProb", alias = "sentenceProb", default)]
    pub sent_prob: Option<f64>,
    #[serde(default)]
    pub bidirectional: Option<bool>,
}

/// Serialized graph: `{"nodes": [...], "links": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<RawNode>,
    pub links: Vec<RawLink>,
}

/// Graph-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    #[serde(rename = "nodeCount")]
    pub node_count: usize,
    #[serde(rename = "edgeCount")]
    pub edge_count: usize,
    pub documents: usize,
    pub evidence: usize,
    pub authors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_aliases() {
        let labels: Vec<EdgeLabel> =
            serde_json::from_str(r#"["true", "false", "supports", "author", "evidence"]"#).unwrap();
        assert_eq!(
            labels,
            vec![
                EdgeLabel::Supports,
                EdgeLabel::Refutes,
                EdgeLabel::Supports,
                EdgeLabel::AuthorOf,
                EdgeLabel::Rationale
            ]
        );
    }

    #[test]
    fn test_polarity() {
        assert_eq!(EdgeLabel::Supports.polarity(), Some(1.0));
        assert_eq!(EdgeLabel::Refutes.polarity(), Some(-1.0));
        assert!(!EdgeLabel::Reference.is_polar());
        assert!(!EdgeLabel::Rationale.is_polar());
    }

    #[test]
    fn test_raw_node_defaults() {
        let node: RawNode =
            serde_json::from_str(r#"{"id": "d1", "type": "document", "size": 0.7}"#).unwrap();
        assert_eq!(node.node_type, NodeType::Document);
        assert_eq!(node.size, 0.7);
        assert!(node.size_raw.is_none());
    }
}
