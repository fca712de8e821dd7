//! Pulse Graph - force-directed layout for space graphs
//!
//! Spaces become circles sized by agent count. Repulsion keeps them
//! apart, edges pull related spaces together and trusted spaces are drawn
//! toward the center of the canvas.
//!
//! ```ignore
//! let config = LayoutConfig::default();
//! let state = create_graph(&snapshot.spaces, &edges, &config);
//! let state = run_simulation(state, &config);
//! if let Some(node) = hit_test(&state, mouse_x, mouse_y) {
//!     println!("{}", node.space.name);
//! }
//! ```

pub mod config;
pub mod graph;
pub mod scale;
pub mod simulation;

pub use config::LayoutConfig;
pub use graph::{
    create_graph, create_graph_with_rng, dedupe_spaces, hit_test, Edge, GraphNode, GraphState,
    NodePosition,
};
pub use scale::{get_node_radius, get_trust_gravity, MAX_RADIUS, MIN_RADIUS};
pub use simulation::{run_simulation, step_simulation};
