//! Maps the analysis store onto node and link styles of the graph scene.

use std::collections::HashSet;

use crate::api::AnalysisMode;
use crate::components::force_graph::{GraphStyler, LinkStyle, NodeStyle};
use crate::config::Palette;

use super::colors::HeatMap;
use super::edges::EdgeKey;
use super::state::{AnalysisState, ProbabilityMap};

pub const FLASH_ACTIVATED: &str = "#ffffff";
pub const FLASH_RECOVERED: &str = "#00ff7f";

pub const DEFAULT_SIZE: f64 = 2.0;
const FLASH_SIZE: f64 = 25.0;
const SPECIAL_SIZE: f64 = 20.0;
const COMMUNITY_SIZE: f64 = 18.0;
const PROBABILITY_SIZE: f64 = 15.0;

const PARTICLES: u32 = 4;

/// Snapshot of everything the scene needs from the store.
#[derive(Clone, Debug)]
pub struct SceneStyler {
	palette: Palette,
	minimization: bool,
	probabilities: ProbabilityMap,
	heat: HeatMap,
	special: HashSet<String>,
	flash_activated: HashSet<String>,
	flash_recovered: HashSet<String>,
	recovered: HashSet<String>,
	saved: HashSet<String>,
	community: Option<(HashSet<String>, HeatMap)>,
	critical: HashSet<EdgeKey>,
	propagation: HashSet<EdgeKey>,
	cut_off: HashSet<EdgeKey>,
}

impl SceneStyler {
	pub fn new(state: &AnalysisState, palette: &Palette) -> Self {
		let minimization = state.mode == AnalysisMode::Minimization;
		let saved = if state.interactive.enabled && minimization {
			state.interactive.saved.clone()
		} else {
			HashSet::new()
		};
		Self {
			palette: *palette,
			minimization,
			probabilities: state.probabilities.clone(),
			heat: state.heat.clone(),
			special: state.special_nodes.clone(),
			flash_activated: state.flash.activated.clone(),
			flash_recovered: state.flash.recovered.clone(),
			recovered: state.recovered.clone(),
			saved,
			community: state
				.community
				.active
				.then(|| (state.community.nodes.clone(), state.community.heat.clone())),
			critical: state.critical_links.clone(),
			propagation: state.propagation_links.clone(),
			cut_off: state.cut_off_links.clone(),
		}
	}

	fn is_active(&self, id: &str) -> bool {
		self.probabilities.get(id).is_some_and(|a| a.is_active())
	}

	pub fn node_color(&self, id: &str) -> &'static str {
		let p = &self.palette;
		if self.flash_activated.contains(id) {
			return FLASH_ACTIVATED;
		}
		if self.flash_recovered.contains(id) {
			return FLASH_RECOVERED;
		}
		if self.special.contains(id) {
			return if self.minimization { p.blocking_node } else { p.seed_node };
		}
		if self.saved.contains(id) {
			return p.recovered;
		}
		if let Some((members, heat)) = &self.community {
			if !members.contains(id) {
				return p.inactive;
			}
			return heat.get(id).map_or(p.inactive, |level| level.color(&p.community));
		}
		if self.recovered.contains(id) {
			return p.recovered;
		}
		self.heat
			.get(id)
			.map_or(p.default, |level| level.color(&p.heat))
	}

	pub fn node_size(&self, id: &str) -> f64 {
		if self.flash_activated.contains(id) || self.flash_recovered.contains(id) {
			return FLASH_SIZE;
		}
		if self.special.contains(id) {
			return SPECIAL_SIZE;
		}
		if let Some((members, _)) = &self.community {
			return if members.contains(id) { COMMUNITY_SIZE } else { DEFAULT_SIZE };
		}
		if self.recovered.contains(id) {
			return DEFAULT_SIZE;
		}
		match self.probabilities.get(id) {
			Some(a) if a.is_active() => DEFAULT_SIZE + a.probability * PROBABILITY_SIZE,
			_ => DEFAULT_SIZE,
		}
	}

	pub fn link(&self, source: &str, target: &str) -> LinkStyle {
		let key = EdgeKey::new(source, target);
		let p = &self.palette;
		let both_active = self.is_active(source) && self.is_active(target);

		let (color, width) = if self.critical.contains(&key) {
			(p.critical_path, 4.5)
		} else if self.propagation.contains(&key) {
			(p.propagation, 4.0)
		} else if self.cut_off.contains(&key) {
			(p.cut_off, 3.5)
		} else if both_active {
			(p.activated_link, 1.0)
		} else {
			(p.inactivated_link, 1.0)
		};

		let particles = if self.cut_off.contains(&key) {
			0
		} else if self.propagation.contains(&key) || both_active {
			PARTICLES
		} else {
			0
		};

		LinkStyle {
			color: color.to_string(),
			width,
			particles,
		}
	}
}

impl GraphStyler for SceneStyler {
	fn background(&self) -> String {
		self.palette.background.to_string()
	}

	fn particle_color(&self) -> String {
		self.palette.particle.to_string()
	}

	fn node_style(&self, id: &str) -> NodeStyle {
		NodeStyle {
			color: self.node_color(id).to_string(),
			size: self.node_size(id),
		}
	}

	fn link_style(&self, source: &str, target: &str) -> LinkStyle {
		self.link(source, target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::colors::HeatLevel;
	use crate::analysis::state::NodeActivation;
	use crate::api::{NodeStatus, PathEdge};
	use crate::config::LIGHT;

	fn active(state: &mut AnalysisState, id: &str, p: f64) {
		state
			.probabilities
			.insert(id.into(), NodeActivation::new(p, NodeStatus::Active));
	}

	#[test]
	fn flash_beats_special_beats_heat() {
		let mut state = AnalysisState::default();
		active(&mut state, "1", 0.9);
		state.heat.insert("1".into(), HeatLevel::Hot);
		state.special_nodes.insert("1".into());
		state.flash.activated.insert("1".into());

		let styler = SceneStyler::new(&state, &LIGHT);
		assert_eq!(styler.node_color("1"), FLASH_ACTIVATED);
		assert_eq!(styler.node_size("1"), 25.0);

		state.clear_flash();
		let styler = SceneStyler::new(&state, &LIGHT);
		assert_eq!(styler.node_color("1"), LIGHT.seed_node);
		assert_eq!(styler.node_size("1"), 20.0);

		state.set_mode(AnalysisMode::Minimization);
		assert_eq!(SceneStyler::new(&state, &LIGHT).node_color("1"), LIGHT.blocking_node);

		state.special_nodes.clear();
		let styler = SceneStyler::new(&state, &LIGHT);
		assert_eq!(styler.node_color("1"), LIGHT.heat.hot);
		assert!((styler.node_size("1") - (2.0 + 0.9 * 15.0)).abs() < 1e-9);
		assert_eq!(styler.node_color("2"), LIGHT.default);
		assert_eq!(styler.node_size("2"), DEFAULT_SIZE);
	}

	#[test]
	fn community_view_dims_outsiders() {
		let mut state = AnalysisState::default();
		state.community.active = true;
		state.community.nodes.insert("5".into());
		state.community.heat.insert("5".into(), HeatLevel::Mid);
		state.heat.insert("6".into(), HeatLevel::Hot);

		let styler = SceneStyler::new(&state, &LIGHT);
		assert_eq!(styler.node_color("5"), LIGHT.community.mid);
		assert_eq!(styler.node_size("5"), 18.0);
		assert_eq!(styler.node_color("6"), LIGHT.inactive);
		assert_eq!(styler.node_size("6"), DEFAULT_SIZE);
	}

	#[test]
	fn saved_nodes_only_in_interactive_minimization() {
		let mut state = AnalysisState::default();
		state.interactive.saved.insert("3".into());
		assert_eq!(SceneStyler::new(&state, &LIGHT).node_color("3"), LIGHT.default);

		state.set_mode(AnalysisMode::Minimization);
		state.interactive.enabled = true;
		assert_eq!(SceneStyler::new(&state, &LIGHT).node_color("3"), LIGHT.recovered);
	}

	#[test]
	fn link_precedence_and_particles() {
		let mut state = AnalysisState::default();
		state.propagation_links = crate::analysis::edges::edge_set(&[PathEdge { source: 1, target: 2 }]);
		state.cut_off_links.insert(EdgeKey::new("3", "4"));
		state.critical_links.insert(EdgeKey::new("2", "1"));
		active(&mut state, "5", 0.5);
		active(&mut state, "6", 0.5);
		active(&mut state, "3", 0.5);
		active(&mut state, "4", 0.5);

		let styler = SceneStyler::new(&state, &LIGHT);
		let critical = styler.link("2", "1");
		assert_eq!((critical.color.as_str(), critical.width, critical.particles), (LIGHT.critical_path, 4.5, 4));

		let cut = styler.link("4", "3");
		assert_eq!((cut.color.as_str(), cut.width, cut.particles), (LIGHT.cut_off, 3.5, 0));

		let live = styler.link("5", "6");
		assert_eq!((live.color.as_str(), live.width, live.particles), (LIGHT.activated_link, 1.0, 4));

		let idle = styler.link("5", "7");
		assert_eq!((idle.color.as_str(), idle.particles), (LIGHT.inactivated_link, 0));
	}
}
