use serde::Serialize;

use crate::graph::GraphNode;
use crate::util::parse_eth;

/// Discrete galaxy layer driving both layout radius and render styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GalaxyLayer {
    Core,
    Inner,
    Outer,
    Halo,
}

pub fn classify(balance_eth: f32, is_contract: bool) -> GalaxyLayer {
    if is_contract || balance_eth > 10.0 {
        GalaxyLayer::Core
    } else if balance_eth > 1.0 {
        GalaxyLayer::Inner
    } else if balance_eth > 0.1 {
        GalaxyLayer::Outer
    } else {
        GalaxyLayer::Halo
    }
}

pub fn classify_node(node: &GraphNode) -> GalaxyLayer {
    classify(parse_eth(node.balance.as_deref()), node.is_contract)
}

pub fn shell_radius(layer: GalaxyLayer) -> f32 {
    match layer {
        GalaxyLayer::Core => 40.0,
        GalaxyLayer::Inner => 100.0,
        GalaxyLayer::Outer => 180.0,
        GalaxyLayer::Halo => 280.0,
    }
}

pub fn shell_thickness(layer: GalaxyLayer) -> f32 {
    match layer {
        GalaxyLayer::Core => 20.0,
        GalaxyLayer::Inner => 30.0,
        GalaxyLayer::Outer => 40.0,
        GalaxyLayer::Halo => 60.0,
    }
}
