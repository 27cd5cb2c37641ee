pub mod chain;
pub mod graph;
pub mod layout;
pub mod project;
pub mod util;
pub mod vec3;
