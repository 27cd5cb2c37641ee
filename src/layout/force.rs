use rand::Rng;

use crate::graph::TransferGraph;
use crate::vec3::Vec3;

use super::classify::{classify_node, shell_radius};
use super::{PositionedNode, random_unit_vector};

const ITERATIONS: usize = 100;
const REPULSION_STRENGTH: f32 = 2000.0;
const CENTER_ATTRACTION: f32 = 0.05;
const DAMPING: f32 = 0.02;
const MIN_DISTANCE: f32 = 1.0;

/// Positional relaxation: pairwise inverse-square repulsion plus a radial
/// spring toward each node's shell radius. No velocity term; every iteration
/// nudges positions by `force * DAMPING` directly.
pub(super) fn place(
    graph: &TransferGraph,
    target_index: usize,
    rng: &mut impl Rng,
) -> Vec<PositionedNode> {
    let layers = graph.nodes.iter().map(classify_node).collect::<Vec<_>>();
    let radii = layers
        .iter()
        .map(|&layer| shell_radius(layer))
        .collect::<Vec<_>>();
    let node_count = graph.nodes.len();

    let mut positions = (0..node_count)
        .map(|index| {
            if index == target_index {
                Vec3::ZERO
            } else {
                random_unit_vector(rng) * (radii[index] * rng.gen_range(0.5f32..1.0))
            }
        })
        .collect::<Vec<_>>();

    for _ in 0..ITERATIONS {
        positions[target_index] = Vec3::ZERO;
        let mut forces = vec![Vec3::ZERO; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(MIN_DISTANCE);
                let push = (delta / distance) * (REPULSION_STRENGTH / (distance * distance));
                forces[i] += push;
                forces[j] -= push;
            }
        }

        for i in 0..node_count {
            if i == target_index {
                continue;
            }

            let radius = positions[i].length();
            if radius > 0.0001 {
                let direction = positions[i] / radius;
                forces[i] += direction * ((radii[i] - radius) * CENTER_ATTRACTION);
            }
        }

        for i in 0..node_count {
            if i == target_index {
                continue;
            }
            positions[i] += forces[i] * DAMPING;
        }
    }
    positions[target_index] = Vec3::ZERO;

    graph
        .nodes
        .iter()
        .zip(positions)
        .zip(layers)
        .map(|((node, position), layer)| PositionedNode {
            node: node.clone(),
            position,
            layer,
        })
        .collect()
}
