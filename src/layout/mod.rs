mod classify;
mod force;
mod shell;
mod spiral;

pub use classify::{GalaxyLayer, classify, classify_node, shell_radius, shell_thickness};

use std::f32::consts::TAU;

use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;

use crate::graph::{GraphNode, TransferGraph};
use crate::vec3::{Vec3, vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Shell,
    Force,
    Fibonacci,
}

/// One node with its computed 3D position. A layout pass always produces a
/// fresh, complete set of these.
#[derive(Clone, Debug, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    #[serde(flatten)]
    pub position: Vec3,
    #[serde(rename = "galaxyLayer")]
    pub layer: GalaxyLayer,
}

/// Cache key deciding whether a stored layout is still valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub target_node_id: String,
    pub node_ids: Vec<String>,
}

impl LayoutConfig {
    pub fn new(mode: LayoutMode, target_node_id: &str, graph: &TransferGraph) -> Self {
        Self {
            mode,
            target_node_id: target_node_id.to_ascii_lowercase(),
            node_ids: graph.node_ids(),
        }
    }
}

/// True when a cached layout must be thrown away: no previous layout, or the
/// mode, target, or ordered node-id sequence changed. Compared by value so
/// re-renders with unchanged data never trigger regeneration.
pub fn should_regenerate(previous: Option<&LayoutConfig>, next: &LayoutConfig) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    previous.mode != next.mode
        || previous.target_node_id != next.target_node_id
        || previous.node_ids != next.node_ids
}

/// Computes 3D positions for every node under the chosen algorithm. The
/// target node (by id, falling back to the first node) sits at the origin in
/// every mode.
pub fn generate_layout(
    graph: &TransferGraph,
    mode: LayoutMode,
    target_node_id: &str,
    rng: &mut impl Rng,
) -> Vec<PositionedNode> {
    if graph.nodes.is_empty() {
        return Vec::new();
    }

    let target_index = graph
        .nodes
        .iter()
        .position(|node| node.id.eq_ignore_ascii_case(target_node_id))
        .unwrap_or(0);

    match mode {
        LayoutMode::Shell => shell::place(graph, target_index, rng),
        LayoutMode::Force => force::place(graph, target_index, rng),
        LayoutMode::Fibonacci => spiral::place(graph, target_index, rng),
    }
}

/// Unbiased point on the unit sphere: uniform theta, `phi = acos(2u - 1)`.
fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.r#gen::<f32>() * TAU;
    let phi = (2.0 * rng.r#gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    vec3(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}
