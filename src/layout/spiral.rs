use std::f32::consts::PI;

use rand::Rng;

use crate::graph::{GraphNode, TransferGraph};
use crate::util::parse_eth;
use crate::vec3::{Vec3, vec3};

use super::PositionedNode;
use super::classify::{classify_node, shell_radius};

const JITTER: f32 = 0.15;

/// Golden-angle spiral: non-target nodes ranked by importance and wound
/// around their layer's sphere, target prepended at the origin.
pub(super) fn place(
    graph: &TransferGraph,
    target_index: usize,
    rng: &mut impl Rng,
) -> Vec<PositionedNode> {
    let golden_angle = PI * (3.0 - 5.0f32.sqrt());

    let mut ranked = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target_index)
        .map(|(_, node)| node)
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| importance(b).total_cmp(&importance(a)));

    let total = ranked.len().max(1) as f32;
    let mut placed = Vec::with_capacity(graph.nodes.len());

    let target = &graph.nodes[target_index];
    placed.push(PositionedNode {
        node: target.clone(),
        position: Vec3::ZERO,
        layer: classify_node(target),
    });

    for (spiral_index, node) in ranked.into_iter().enumerate() {
        let layer = classify_node(node);
        let radius = shell_radius(layer);

        let t = spiral_index as f32 / total;
        let y = (1.0 - 2.0 * t) * radius * 0.8;
        let ring = (radius * radius - y * y).max(0.0).sqrt();
        let angle = golden_angle * spiral_index as f32;

        let jitter_x = 1.0 + (rng.r#gen::<f32>() - 0.5) * (JITTER * 2.0);
        let jitter_z = 1.0 + (rng.r#gen::<f32>() - 0.5) * (JITTER * 2.0);

        placed.push(PositionedNode {
            node: node.clone(),
            position: vec3(
                ring * angle.cos() * jitter_x,
                y,
                ring * angle.sin() * jitter_z,
            ),
            layer,
        });
    }

    placed
}

/// Contracts rank ahead of any plain wallet; wallets rank by balance.
fn importance(node: &GraphNode) -> f32 {
    let balance = parse_eth(node.balance.as_deref());
    if node.is_contract {
        1000.0 + balance
    } else {
        balance
    }
}
