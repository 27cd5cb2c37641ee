use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::graph::TransferGraph;
use crate::vec3::Vec3;

use super::classify::{classify_node, shell_radius, shell_thickness};
use super::{PositionedNode, random_unit_vector};

/// Spherical-shell placement: each non-target node lands on its layer's
/// shell, with random thickness and an orbital tilt derived from the node
/// index so same-layer nodes spread over several tilted rings.
pub(super) fn place(
    graph: &TransferGraph,
    target_index: usize,
    rng: &mut impl Rng,
) -> Vec<PositionedNode> {
    graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let layer = classify_node(node);
            if index == target_index {
                return PositionedNode {
                    node: node.clone(),
                    position: Vec3::ZERO,
                    layer,
                };
            }

            let radius =
                shell_radius(layer) + rng.gen_range(-1.0f32..1.0) * shell_thickness(layer);
            let position = orbital_transform(random_unit_vector(rng) * radius, index);

            PositionedNode {
                node: node.clone(),
                position,
                layer,
            }
        })
        .collect()
}

fn orbital_transform(position: Vec3, index: usize) -> Vec3 {
    let num_orbitals = ((index as f32) + 1.0).sqrt().ceil().max(1.0);
    let orbital = (index % num_orbitals as usize) as f32;

    let tilt = orbital / num_orbitals * PI;
    let swing = orbital / num_orbitals * TAU;
    position.rotated_x(tilt).rotated_y(swing)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::layout::tests::sample_graph;
    use crate::layout::{GalaxyLayer, shell_radius, shell_thickness};

    use super::*;

    #[test]
    fn nodes_stay_within_their_shell_band() {
        let graph = sample_graph();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            let placed = place(&graph, 0, &mut rng);
            for positioned in placed.iter().skip(1) {
                let radius = positioned.position.length();
                let shell = shell_radius(positioned.layer);
                let band = shell_thickness(positioned.layer);
                assert!(
                    radius >= shell - band - 1e-3 && radius <= shell + band + 1e-3,
                    "{} at radius {radius} outside shell {shell} +/- {band}",
                    positioned.node.id
                );
            }
        }
    }

    #[test]
    fn contract_node_sits_on_the_core_shell() {
        let graph = sample_graph();
        let mut rng = StdRng::seed_from_u64(4);
        let placed = place(&graph, 0, &mut rng);

        let contract = placed.iter().find(|p| p.node.id == "0xee").unwrap();
        assert_eq!(contract.layer, GalaxyLayer::Core);
        assert!(contract.position.length() <= 60.0 + 1e-3);
    }

    #[test]
    fn target_never_moves() {
        let graph = sample_graph();
        let mut rng = StdRng::seed_from_u64(17);
        let placed = place(&graph, 3, &mut rng);
        assert_eq!(placed[3].position, Vec3::ZERO);
    }
}
