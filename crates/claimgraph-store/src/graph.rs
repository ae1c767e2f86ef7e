//! Fact-checking graph backed by petgraph.

use std::collections::HashMap;
use std::path::Path;

use claimgraph_core::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, info};

use crate::query::GraphQuery;
use crate::types::*;

/// In-memory claim/document/evidence/author graph.
///
/// Edges are undirected: the label carries polarity, not direction.
/// At most one edge exists between any pair of nodes.
#[derive(Debug, Clone)]
pub struct FactGraph {
    graph: UnGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
}

impl FactGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            node_index: HashMap::new(),
        }
    }

    /// Build a graph from a parsed graph document.
    ///
    /// Reciprocal evidence links are merged first, then the result must hold
    /// exactly one claim node and only edges between declared nodes.
    pub fn from_document(doc: GraphDocument) -> Result<Self> {
        let types: HashMap<&str, NodeType> = doc
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.node_type))
            .collect();
        let links = merge_reciprocal_links(doc.links.clone(), &types);

        let mut graph = Self::new();
        for raw in doc.nodes {
            let mut node = Node::new(raw.id, raw.node_type, raw.size);
            node.raw_score = raw.size_raw.unwrap_or(raw.size);
            node.text = raw.text;
            graph.add_node(node)?;
        }
        for link in links {
            let mut edge = Edge::new(link.source, link.target, link.label, link.width);
            edge.sentence_prob = link.sent_prob;
            edge.bidirectional = link.bidirectional.unwrap_or(false);
            graph.add_edge(edge)?;
        }

        let claims = graph.ids_of_type(NodeType::Claim).len();
        if claims != 1 {
            return Err(Error::InvalidGraph(format!(
                "expected exactly one claim node, found {}",
                claims
            )));
        }

        let stats = graph.stats();
        info!(
            "Loaded graph: {} nodes ({} documents, {} evidence), {} edges",
            stats.node_count, stats.documents, stats.evidence, stats.edge_count
        );
        Ok(graph)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Read a graph document from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading graph document {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the current state, scores included, back to a graph document.
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .nodes()
            .map(|n| RawNode {
                id: n.id.clone(),
                node_type: n.node_type,
                size: n.score,
                size_raw: Some(n.raw_score),
                text: n.text.clone(),
            })
            .collect();
        let links = self
            .edges()
            .map(|e| RawLink {
                source: e.source.clone(),
                target: e.target.clone(),
                label: e.label,
                width: e.weight,
                sent_prob: e.sentence_prob,
                bidirectional: Some(e.bidirectional),
            })
            .collect();
        GraphDocument { nodes, links }
    }

    /// Add a node. Ids must be unique and only one claim is allowed.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(Error::InvalidGraph(format!("duplicate node id {}", node.id)));
        }
        if node.node_type == NodeType::Claim && !self.ids_of_type(NodeType::Claim).is_empty() {
            return Err(Error::InvalidGraph(format!(
                "second claim node {}",
                node.id
            )));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(())
    }

    /// Add an edge between two existing nodes, replacing any edge already
    /// joining them.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let a = self.index_of(&edge.source)?;
        let b = self.index_of(&edge.target)?;
        if a == b {
            return Err(Error::MalformedTopology(format!(
                "self-loop on {}",
                edge.source
            )));
        }
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(Error::MalformedTopology(format!(
                "edge {} - {} has weight {}",
                edge.source, edge.target, edge.weight
            )));
        }
        self.graph.update_edge(a, b, edge);
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::MalformedTopology(format!("unknown node {}", id)))
    }

    /// Overwrite a node's current score.
    pub fn set_score(&mut self, id: &str, score: f64) -> Result<()> {
        let idx = self
            .node_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("node {}", id)))?;
        self.graph[idx].score = score;
        Ok(())
    }

    /// Restore every node's score from its raw baseline.
    pub fn reset_scores(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.score = node.raw_score;
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    pub fn claim(&self) -> Option<&Node> {
        self.nodes().find(|n| n.node_type == NodeType::Claim)
    }

    /// Current score of every node, keyed by id.
    pub fn scores(&self) -> HashMap<NodeId, f64> {
        self.nodes().map(|n| (n.id.clone(), n.score)).collect()
    }

    pub fn stats(&self) -> GraphStats {
        let count = |t: NodeType| self.nodes().filter(|n| n.node_type == t).count();
        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            documents: count(NodeType::Document),
            evidence: count(NodeType::Evidence),
            authors: count(NodeType::Author),
        }
    }
}

impl Default for FactGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphQuery for FactGraph {
    fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    fn neighbors(&self, id: &str) -> Vec<&Node> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        let mut indices: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        indices.sort();
        indices.dedup();
        indices.into_iter().map(|n| &self.graph[n]).collect()
    }

    fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        let a = *self.node_index.get(a)?;
        let b = *self.node_index.get(b)?;
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    fn ids_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| n.node_type == node_type)
            .map(|n| n.id.clone())
            .collect()
    }
}

/// Fold both directions of an evidence-evidence link into one.
///
/// Agreeing labels merge into a single bidirectional link with averaged
/// weight and sentence probability; disagreeing labels drop both links.
/// Other links pass through, a repeated `(source, target)` keeping the last.
fn merge_reciprocal_links(links: Vec<RawLink>, types: &HashMap<&str, NodeType>) -> Vec<RawLink> {
    let is_evidence = |id: &str| types.get(id) == Some(&NodeType::Evidence);

    let mut kept: Vec<Option<RawLink>> = Vec::with_capacity(links.len());
    let mut by_key: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    let mut merged = 0usize;
    let mut dropped = 0usize;

    for link in links {
        let key = (link.source.clone(), link.target.clone());
        let reverse = (link.target.clone(), link.source.clone());

        if is_evidence(&link.source) && is_evidence(&link.target) {
            if let Some(pos) = by_key.remove(&reverse) {
                let Some(first) = kept[pos].take() else {
                    continue;
                };
                if first.label == link.label {
                    let sent_prob = match (first.sent_prob, link.sent_prob) {
                        (Some(a), Some(b)) => Some((a + b) / 2.0),
                        (a, b) => a.or(b),
                    };
                    kept[pos] = Some(RawLink {
                        source: first.source,
                        target: first.target,
                        label: first.label,
                        width: (first.width + link.width) / 2.0,
                        sent_prob,
                        bidirectional: Some(true),
                    });
                    merged += 1;
                } else {
                    dropped += 2;
                }
                continue;
            }
        }

        if let Some(&pos) = by_key.get(&key) {
            kept[pos] = Some(link);
        } else {
            by_key.insert(key, kept.len());
            kept.push(Some(link));
        }
    }

    if merged > 0 || dropped > 0 {
        debug!(
            "Reciprocal evidence links: {} merged, {} dropped on label conflict",
            merged, dropped
        );
    }

    kept.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "nodes": [
            {"id": "Claim", "type": "claim", "size": 0},
            {"id": "d1", "type": "document", "size": 0.8, "sizeRaw": 0.6},
            {"id": "d1_0", "type": "evidence", "size": 0, "text": "Turnout rose in 2020."},
            {"id": "d1_1", "type": "evidence", "size": 0},
            {"id": "a1", "type": "author", "size": 0.3}
        ],
        "links": [
            {"source": "d1", "target": "Claim", "label": "true", "width": 0.9},
            {"source": "d1_0", "target": "d1", "label": "evidence", "width": 0.4},
            {"source": "d1_1", "target": "d1", "label": "evidence", "width": 0.6},
            {"source": "d1_0", "target": "d1_1", "label": "true", "width": 0.5, "sentProb": 0.2},
            {"source": "d1_1", "target": "d1_0", "label": "true", "width": 0.7, "sentProb": 0.4},
            {"source": "d1", "target": "a1", "label": "author", "width": 1}
        ]
    }"#;

    #[test]
    fn test_from_json_builds_typed_graph() {
        let graph = FactGraph::from_json_str(SAMPLE).unwrap();
        let stats = graph.stats();
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.evidence, 2);
        assert_eq!(stats.authors, 1);
        assert_eq!(stats.edge_count, 5);
        assert_eq!(graph.claim().unwrap().id, "Claim");

        let doc = graph.node("d1").unwrap();
        assert_eq!(doc.score, 0.8);
        assert_eq!(doc.raw_score, 0.6);
    }

    #[test]
    fn test_reciprocal_links_merge() {
        let graph = FactGraph::from_json_str(SAMPLE).unwrap();
        let edge = graph.edge_between("d1_1", "d1_0").unwrap();
        assert_eq!(edge.label, EdgeLabel::Supports);
        assert!((edge.weight - 0.6).abs() < 1e-12);
        assert!((edge.sentence_prob.unwrap() - 0.3).abs() < 1e-12);
        assert!(edge.bidirectional);
    }

    #[test]
    fn test_conflicting_reciprocal_links_dropped() {
        let json = r#"{
            "nodes": [
                {"id": "Claim", "type": "claim", "size": 0},
                {"id": "e1", "type": "evidence", "size": 0},
                {"id": "e2", "type": "evidence", "size": 0}
            ],
            "links": [
                {"source": "e1", "target": "e2", "label": "true", "width": 0.5},
                {"source": "e2", "target": "e1", "label": "false", "width": 0.5}
            ]
        }"#;
        let graph = FactGraph::from_json_str(json).unwrap();
        assert!(graph.edge_between("e1", "e2").is_none());
        assert_eq!(graph.stats().edge_count, 0);
    }

    #[test]
    fn test_unknown_endpoint_is_malformed() {
        let mut graph = FactGraph::new();
        graph
            .add_node(Node::new("e1", NodeType::Evidence, 0.0))
            .unwrap();
        let err = graph
            .add_edge(Edge::new("e1", "ghost", EdgeLabel::Supports, 0.5))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedTopology(_)));
    }

    #[test]
    fn test_negative_weight_is_malformed() {
        let mut graph = FactGraph::new();
        graph.add_node(Node::new("e1", NodeType::Evidence, 0.0)).unwrap();
        graph.add_node(Node::new("e2", NodeType::Evidence, 0.0)).unwrap();
        let err = graph
            .add_edge(Edge::new("e1", "e2", EdgeLabel::Refutes, -0.5))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedTopology(_)));
    }

    #[test]
    fn test_missing_claim_rejected() {
        let json = r#"{"nodes": [{"id": "e1", "type": "evidence"}], "links": []}"#;
        let err = FactGraph::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn test_second_claim_rejected() {
        let mut graph = FactGraph::new();
        graph.add_node(Node::new("c1", NodeType::Claim, 0.0)).unwrap();
        assert!(graph.add_node(Node::new("c2", NodeType::Claim, 0.0)).is_err());
    }

    #[test]
    fn test_add_edge_replaces_existing_pair() {
        let mut graph = FactGraph::new();
        graph.add_node(Node::new("e1", NodeType::Evidence, 0.0)).unwrap();
        graph.add_node(Node::new("e2", NodeType::Evidence, 0.0)).unwrap();
        graph
            .add_edge(Edge::new("e1", "e2", EdgeLabel::Supports, 0.2))
            .unwrap();
        graph
            .add_edge(Edge::new("e2", "e1", EdgeLabel::Refutes, 0.9))
            .unwrap();
        assert_eq!(graph.stats().edge_count, 1);
        assert_eq!(graph.edge_between("e1", "e2").unwrap().label, EdgeLabel::Refutes);
    }

    #[test]
    fn test_neighbors_of_type_in_insertion_order() {
        let graph = FactGraph::from_json_str(SAMPLE).unwrap();
        let ids: Vec<&str> = graph
            .neighbors_of_type("d1", NodeType::Evidence)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1_0", "d1_1"]);
        assert_eq!(graph.neighbors_of_type("d1", NodeType::Author).len(), 1);
    }

    #[test]
    fn test_nodes_with_ids_skips_unknown() {
        let graph = FactGraph::from_json_str(SAMPLE).unwrap();
        let ids = vec!["d1_1".to_string(), "nope".to_string(), "d1".to_string()];
        let nodes = graph.nodes_with_ids(&ids);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "d1_1");
        assert_eq!(nodes[1].id, "d1");
    }

    #[test]
    fn test_reset_scores_restores_raw() {
        let mut graph = FactGraph::from_json_str(SAMPLE).unwrap();
        graph.set_score("d1", 5.0).unwrap();
        graph.set_score("d1_0", 2.0).unwrap();
        graph.reset_scores();
        assert_eq!(graph.node("d1").unwrap().score, 0.6);
        assert_eq!(graph.node("d1_0").unwrap().score, 0.0);
    }

    #[test]
    fn test_set_score_unknown_node() {
        let mut graph = FactGraph::new();
        assert!(matches!(
            graph.set_score("missing", 1.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_load_json_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let graph = FactGraph::load_json(file.path()).unwrap();
        assert_eq!(graph.stats().node_count, 5);
    }

    #[test]
    fn test_document_roundtrip_keeps_scores() {
        let mut graph = FactGraph::from_json_str(SAMPLE).unwrap();
        graph.set_score("d1_0", 0.25).unwrap();
        let doc = graph.to_document();
        let json = serde_json::to_string(&doc).unwrap();
        let reloaded = FactGraph::from_json_str(&json).unwrap();
        assert_eq!(reloaded.node("d1_0").unwrap().score, 0.25);
        assert_eq!(reloaded.stats().edge_count, graph.stats().edge_count);
    }

    #[test]
    fn test_evidence_text_survives_roundtrip() {
        let graph = FactGraph::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            graph.node("d1_0").unwrap().text.as_deref(),
            Some("Turnout rose in 2020.")
        );
        assert_eq!(graph.node("d1_1").unwrap().text, None);

        let json = serde_json::to_value(graph.to_document()).unwrap();
        let nodes = json["nodes"].as_array().unwrap();
        let d1_0 = nodes.iter().find(|n| n["id"] == "d1_0").unwrap();
        assert_eq!(d1_0["text"], "Turnout rose in 2020.");
        let d1_1 = nodes.iter().find(|n| n["id"] == "d1_1").unwrap();
        assert!(d1_1.get("text").is_none());
    }
}
