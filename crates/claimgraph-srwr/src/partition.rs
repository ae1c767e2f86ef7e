//! Connected-component partitioning inside a node-id universe.

use std::collections::{HashSet, VecDeque};

use claimgraph_store::{GraphQuery, NodeId};

/// Split `universe` into maximal connected components.
///
/// Two ids are connected when an edge joins them and both belong to
/// `universe`; edges leaving the universe are ignored. Components come out
/// in order of their first member in `universe`, members in breadth-first
/// order from that seed. Duplicate ids in `universe` are counted once.
pub fn partition<Q: GraphQuery + ?Sized>(graph: &Q, universe: &[NodeId]) -> Vec<Vec<NodeId>> {
    let members: HashSet<&str> = universe.iter().map(String::as_str).collect();
    let mut visited: HashSet<&str> = HashSet::with_capacity(members.len());
    let mut components = Vec::new();

    for seed in universe {
        if !visited.insert(seed.as_str()) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::from([seed.as_str()]);

        while let Some(current) = queue.pop_front() {
            component.push(current.to_string());
            for neighbor in graph.neighbors(current) {
                let Some(&id) = members.get(neighbor.id.as_str()) else {
                    continue;
                };
                if visited.insert(id) {
                    queue.push_back(id);
                }
            }
        }

        components.push(component);
    }

    components
}
