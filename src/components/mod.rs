pub mod charts;
pub mod controls;
pub mod force_graph;
pub mod legend;
pub mod results;
pub mod timeline;
