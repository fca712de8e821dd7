//! Force simulation
//!
//! One step applies, in order:
//! - inverse-square repulsion between every pair of nodes
//! - Hooke springs along edges whose endpoints both exist
//! - a pull toward the canvas center weighted by trust
//!
//! then integrates velocity with damping and clamps positions to the
//! canvas. Clamping is a hard wall: velocity is kept as is.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::graph::GraphState;
use crate::scale::get_trust_gravity;

/// Floor for pair distance in the repulsion term
const MIN_DISTANCE: f64 = 0.1;

/// Scale applied to the gravity term on top of the configured strength
const GRAVITY_SCALE: f64 = 0.01;

/// Unit vector and length from `a` to `b`
///
/// Coincident points get an arbitrary but fixed direction so they still
/// separate.
fn direction(ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let distance = dx.hypot(dy);
    if distance > 0.0 {
        (dx / distance, dy / distance, distance)
    } else {
        (1.0, 0.0, 0.0)
    }
}

/// Advance the simulation by one step, returning the new state
pub fn step_simulation(state: &GraphState, config: &LayoutConfig) -> GraphState {
    let mut next = state.clone();
    let nodes = &mut next.nodes;

    for node in nodes.iter_mut() {
        node.fx = 0.0;
        node.fy = 0.0;
    }

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (ux, uy, distance) = direction(nodes[i].x, nodes[i].y, nodes[j].x, nodes[j].y);
            let force = config.repulsion / distance.max(MIN_DISTANCE).powi(2);
            nodes[i].fx -= ux * force;
            nodes[i].fy -= uy * force;
            nodes[j].fx += ux * force;
            nodes[j].fy += uy * force;
        }
    }

    let index: HashMap<&str, usize> = state
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.space.id.as_str(), i))
        .collect();

    for edge in &state.edges {
        let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        else {
            trace!("Skipping dangling edge {} -> {}", edge.source, edge.target);
            continue;
        };
        if s == t {
            continue;
        }
        let (ux, uy, distance) = direction(nodes[s].x, nodes[s].y, nodes[t].x, nodes[t].y);
        let force = config.spring * (distance - config.ideal_length);
        nodes[s].fx += ux * force;
        nodes[s].fy += uy * force;
        nodes[t].fx -= ux * force;
        nodes[t].fy -= uy * force;
    }

    let (width, height) = (state.width, state.height);
    let (cx, cy) = (width / 2.0, height / 2.0);
    let mut energy = 0.0;

    for node in nodes.iter_mut() {
        let pull = get_trust_gravity(node.space.trust) * config.gravity * GRAVITY_SCALE;
        node.fx += (cx - node.x) * pull;
        node.fy += (cy - node.y) * pull;

        node.vx = (node.vx + node.fx) * config.damping;
        node.vy = (node.vy + node.fy) * config.damping;
        node.x = clamp_axis(node.x + node.vx, node.radius, width);
        node.y = clamp_axis(node.y + node.vy, node.radius, height);

        energy += node.vx * node.vx + node.vy * node.vy;
    }

    next.energy = energy;
    next
}

/// Keep a coordinate within `[radius, extent - radius]`
///
/// A node wider than the canvas is pinned to `radius`.
fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    value.max(radius).min((extent - radius).max(radius))
}

/// Step until the energy drops below the convergence threshold or the
/// iteration cap is reached
pub fn run_simulation(state: GraphState, config: &LayoutConfig) -> GraphState {
    let mut current = state;
    for iteration in 0..config.max_iterations {
        current = step_simulation(&current, config);
        if current.energy < config.convergence {
            debug!(
                "Layout converged after {} steps (energy {:.4})",
                iteration + 1,
                current.energy
            );
            return current;
        }
    }
    debug!(
        "Layout stopped at {} steps (energy {:.4})",
        config.max_iterations, current.energy
    );
    current
}
