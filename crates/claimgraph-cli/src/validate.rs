//! Graph document checks: load a graph file and report what propagation
//! will see before running it.

use std::path::Path;

use claimgraph_srwr::Topology;
use claimgraph_store::{FactGraph, GraphQuery, GraphStats, NodeType};
use tracing::{error, info};

/// Result of checking one graph document.
#[derive(Debug)]
pub struct ValidationReport {
    pub graph_valid: bool,
    pub stats: Option<GraphStats>,
    pub subgraphs: usize,
    pub singletons: usize,
    pub largest_subgraph: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Load the graph at `path` and collect structural warnings.
pub fn validate(path: &Path) -> ValidationReport {
    let mut report = ValidationReport {
        graph_valid: false,
        stats: None,
        subgraphs: 0,
        singletons: 0,
        largest_subgraph: 0,
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    let graph = match FactGraph::load_json(path) {
        Ok(g) => g,
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            report.errors.push(format!("Failed to load graph: {}", e));
            return report;
        }
    };

    let topology = Topology::evidence(&graph);
    report.subgraphs = topology.subgraphs.len();
    report.singletons = topology.subgraphs.iter().filter(|s| s.len() == 1).count();
    report.largest_subgraph = topology.subgraphs.iter().map(|s| s.len()).max().unwrap_or(0);

    for doc_id in graph.ids_of_type(NodeType::Document) {
        let evidence = graph.neighbors_of_type(&doc_id, NodeType::Evidence);
        if evidence.is_empty() {
            report
                .warnings
                .push(format!("Document {} has no evidence and keeps its score", doc_id));
            continue;
        }
        let weight: f64 = evidence
            .iter()
            .filter_map(|e| graph.edge_between(&doc_id, &e.id))
            .map(|edge| edge.weight)
            .sum();
        if weight <= 0.0 {
            report.warnings.push(format!(
                "Document {} has zero total evidence weight and distributes nothing",
                doc_id
            ));
        }
    }

    for evi_id in graph.ids_of_type(NodeType::Evidence) {
        if graph.neighbors_of_type(&evi_id, NodeType::Document).is_empty() {
            report
                .warnings
                .push(format!("Evidence {} is not linked to any document", evi_id));
        }
    }

    if let Some(claim) = graph.claim() {
        let polar = graph
            .neighbors_of_type(&claim.id, NodeType::Document)
            .into_iter()
            .filter(|d| {
                graph
                    .edge_between(&d.id, &claim.id)
                    .is_some_and(|e| e.label.is_polar())
            })
            .count();
        if polar == 0 {
            report
                .warnings
                .push("No document supports or refutes the claim; verdicts are undetermined".into());
        }
    }

    report.stats = Some(graph.stats());
    report.graph_valid = true;
    info!(
        "Validated {}: {} subgraphs, {} warnings",
        path.display(),
        report.subgraphs,
        report.warnings.len()
    );
    report
}

pub fn print_report(report: &ValidationReport) {
    println!("=== Claim Graph Report ===");
    println!();
    println!("Graph valid:        {}", if report.graph_valid { "YES" } else { "NO" });
    if let Some(stats) = &report.stats {
        println!("Nodes:              {}", stats.node_count);
        println!("Edges:              {}", stats.edge_count);
        println!("Documents:          {}", stats.documents);
        println!("Evidence:           {}", stats.evidence);
        println!("Authors:            {}", stats.authors);
    }
    println!("Subgraphs:          {}", report.subgraphs);
    println!("Singletons:         {}", report.singletons);
    println!("Largest subgraph:   {}", report.largest_subgraph);

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.errors.is_empty() && report.graph_valid {
        println!("Status: READY");
    } else {
        println!("Status: INVALID");
    }
}
