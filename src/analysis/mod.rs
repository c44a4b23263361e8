//! Client-side analysis store and the pure logic derived from it.

pub mod colors;
pub mod edges;
pub mod form;
pub mod metrics;
pub mod state;
pub mod timeline;
pub mod visuals;

pub use colors::HeatLevel;
pub use edges::EdgeKey;
pub use form::AnalysisForm;
pub use metrics::{CommunitySummary, MaximizationSummary, MinimizationSummary, ResultPanel};
pub use state::{AnalysisState, MinimizationView};
pub use timeline::{AnimationKind, Playback};
pub use visuals::SceneStyler;
