//! Graph construction and picking
//!
//! A [`GraphState`] is a value: every simulation step returns a new one and
//! leaves its input untouched, so a state can be handed to another thread
//! without synchronization.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use pulse_core::Space;

use crate::config::LayoutConfig;
use crate::scale::get_node_radius;

/// Relationship between two spaces, by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: None,
        }
    }
}

/// A space placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub space: Space,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Force accumulated during the last step
    pub fx: f64,
    pub fy: f64,
    pub radius: f64,
}

impl GraphNode {
    pub fn id(&self) -> &str {
        &self.space.id
    }

    pub fn position(&self) -> NodePosition<'_> {
        NodePosition {
            id: &self.space.id,
            x: self.x,
            y: self.y,
            radius: self.radius,
        }
    }
}

/// What a renderer needs to draw one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition<'a> {
    pub id: &'a str,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Nodes, edges and the kinetic energy of the last step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    pub width: f64,
    pub height: f64,
    /// `f64::INFINITY` until the first step has run
    pub energy: f64,
}

impl GraphState {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.space.id == id)
    }
}

/// Collapse duplicate ids
///
/// The last occurrence of an id supplies the data, the first occurrence
/// fixes its position in the output.
pub fn dedupe_spaces(spaces: &[Space]) -> Vec<Space> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<Space> = Vec::with_capacity(spaces.len());

    for space in spaces {
        match slots.get(space.id.as_str()) {
            Some(&slot) => unique[slot] = space.clone(),
            None => {
                slots.insert(&space.id, unique.len());
                unique.push(space.clone());
            }
        }
    }

    if unique.len() < spaces.len() {
        debug!("Collapsed {} duplicate space ids", spaces.len() - unique.len());
    }
    unique
}

/// Build a graph with nodes scattered around the canvas center
pub fn create_graph(spaces: &[Space], edges: &[Edge], config: &LayoutConfig) -> GraphState {
    create_graph_with_rng(spaces, edges, config, &mut rand::thread_rng())
}

/// [`create_graph`] with a caller-supplied random source
pub fn create_graph_with_rng<R: Rng + ?Sized>(
    spaces: &[Space],
    edges: &[Edge],
    config: &LayoutConfig,
    rng: &mut R,
) -> GraphState {
    let (cx, cy) = config.center();
    let spread = config.spawn_spread.max(0.0);

    let nodes = dedupe_spaces(spaces)
        .into_iter()
        .map(|space| GraphNode {
            x: cx + rng.gen_range(-spread..=spread),
            y: cy + rng.gen_range(-spread..=spread),
            vx: 0.0,
            vy: 0.0,
            fx: 0.0,
            fy: 0.0,
            radius: get_node_radius(space.agents),
            space,
        })
        .collect();

    GraphState {
        nodes,
        edges: edges.to_vec(),
        width: config.width,
        height: config.height,
        energy: f64::INFINITY,
    }
}

/// Closest node whose disc contains `(x, y)`
pub fn hit_test(state: &GraphState, x: f64, y: f64) -> Option<&GraphNode> {
    state
        .nodes
        .iter()
        .map(|node| (node, (node.x - x).hypot(node.y - y)))
        .filter(|(node, distance)| *distance <= node.radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::Status;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spaces() -> Vec<Space> {
        vec![
            Space::new("moltbook.com", Status::Active).with_agents(Some(11_396)),
            Space::new("clawtasks.io", Status::Steady),
            Space::new("moltbook.com", Status::Surging).with_agents(Some(12_000)),
        ]
    }

    fn node_at(id: &str, x: f64, y: f64, radius: f64) -> GraphNode {
        GraphNode {
            space: Space::new(id, Status::Active),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fx: 0.0,
            fy: 0.0,
            radius,
        }
    }

    #[test]
    fn test_dedupe_last_occurrence_wins() {
        let unique = dedupe_spaces(&spaces());
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "moltbook.com");
        assert_eq!(unique[0].status, Status::Surging);
        assert_eq!(unique[0].agents, Some(12_000));
        assert_eq!(unique[1].id, "clawtasks.io");
    }

    #[test]
    fn test_create_graph_spawn_area() {
        let config = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let state = create_graph_with_rng(&spaces(), &[Edge::new("moltbook.com", "clawtasks.io")], &config, &mut rng);

        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.edges.len(), 1);
        assert!(state.energy.is_infinite());
        for node in &state.nodes {
            assert!((300.0..=500.0).contains(&node.x));
            assert!((200.0..=400.0).contains(&node.y));
            assert_eq!((node.vx, node.vy), (0.0, 0.0));
        }
        assert_eq!(state.nodes[1].radius, get_node_radius(None));
        assert!(state.nodes[0].radius > state.nodes[1].radius);
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let config = LayoutConfig::default();
        let a = create_graph_with_rng(&spaces(), &[], &config, &mut StdRng::seed_from_u64(42));
        let b = create_graph_with_rng(&spaces(), &[], &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hit_test_picks_closest() {
        let state = GraphState {
            nodes: vec![
                node_at("a", 100.0, 100.0, 20.0),
                node_at("b", 110.0, 100.0, 20.0),
                node_at("c", 300.0, 300.0, 8.0),
            ],
            edges: Vec::new(),
            width: 800.0,
            height: 600.0,
            energy: 0.0,
        };
        assert_eq!(hit_test(&state, 108.0, 100.0).map(GraphNode::id), Some("b"));
        assert_eq!(hit_test(&state, 95.0, 100.0).map(GraphNode::id), Some("a"));
        assert_eq!(hit_test(&state, 300.0, 308.0).map(GraphNode::id), Some("c"));
        assert!(hit_test(&state, 300.0, 309.0).is_none());
        assert!(hit_test(&state, 700.0, 50.0).is_none());
    }

    #[test]
    fn test_node_serializes_flat() {
        let json = serde_json::to_value(node_at("a.com", 1.0, 2.0, 8.0)).unwrap();
        assert_eq!(json["id"], "a.com");
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["isNew"], false);
    }

    #[test]
    fn test_position_view() {
        let node = node_at("a.com", 12.5, 40.0, 9.0);
        let pos = node.position();
        assert_eq!(pos.id, "a.com");
        assert_eq!((pos.x, pos.y, pos.radius), (12.5, 40.0, 9.0));
    }
}
