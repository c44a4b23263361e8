mod component;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::{FocusRequest, GraphData, GraphLink, GraphNode, GraphStyler, LinkStyle, NodeStyle};
