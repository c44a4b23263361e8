use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, GraphStyler, LinkStyle, NodeStyle};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

const FOCUS_ZOOM: f64 = 2.0;
const FOCUS_SECONDS: f64 = 1.0;
const FIT_SECONDS: f64 = 0.4;
const FIT_PADDING: f64 = 100.0;
/// Ticks before the initial layout is considered settled and zoomed to fit.
const SETTLE_TICKS: u32 = 240;
/// Fraction of the distance to the community centroid closed per second.
const AGGREGATE_PULL: f64 = 3.0;

pub fn node_radius(size: f64) -> f64 {
	NODE_RADIUS * (size.max(0.1) / 2.0).cbrt()
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub style: NodeStyle,
}

#[derive(Clone, Debug)]
pub struct SceneEdge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub source_id: String,
	pub target_id: String,
	pub style: LinkStyle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

#[derive(Clone, Debug)]
struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Bounding box `(min_x, min_y, max_x, max_y)` → transform that fits it.
pub fn fit_transform(bounds: (f64, f64, f64, f64), width: f64, height: f64, padding: f64) -> ViewTransform {
	let (min_x, min_y, max_x, max_y) = bounds;
	let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
	let (aw, ah) = ((width - 2.0 * padding).max(1.0), (height - 2.0 * padding).max(1.0));
	let k = (aw / bw).min(ah / bh).clamp(0.1, 10.0);
	let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
	ViewTransform {
		x: width / 2.0 - cx * k,
		y: height / 2.0 - cy * k,
		k,
	}
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub background: String,
	pub particle_color: String,
	pub edges: Vec<SceneEdge>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	aggregate: HashSet<DefaultNodeIdx>,
	camera: Option<CameraTween>,
	ticks: u32,
	fitted: bool,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let idx = graph.add_node(NodeData {
				x: (100.0 * angle.cos()) as f32,
				y: (100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					style: NodeStyle::default(),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(SceneEdge {
					source: src,
					target: tgt,
					source_id: link.source.clone(),
					target_id: link.target.clone(),
					style: LinkStyle::default(),
				});
			}
		}

		Self {
			graph,
			edges,
			id_to_idx,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			background: "#1a1a2e".into(),
			particle_color: "#ffffff".into(),
			aggregate: HashSet::new(),
			camera: None,
			ticks: 0,
			fitted: false,
		}
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	pub fn apply_styles(&mut self, styler: &dyn GraphStyler) {
		self.background = styler.background();
		self.particle_color = styler.particle_color();
		self.graph.visit_nodes_mut(|node| {
			let style = styler.node_style(&node.data.user_data.id);
			node.data.user_data.style = style;
		});
		for edge in &mut self.edges {
			edge.style = styler.link_style(&edge.source_id, &edge.target_id);
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		let mut best = f64::MAX;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			// world-space, scales with zoom like nodes
			let reach = HIT_RADIUS.max(node_radius(node.data.user_data.style.size));
			if dist < reach && dist < best {
				best = dist;
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn node_id_at(&self, sx: f64, sy: f64) -> Option<String> {
		self.node_at_position(sx, sy).and_then(|idx| self.node_id(idx))
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.id_to_idx.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	fn position_of(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.id_to_idx.get(id)?;
		self.positions().get(&idx).copied()
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	fn animate_camera(&mut self, to: ViewTransform, duration: f64) {
		self.camera = Some(CameraTween {
			from: self.transform,
			to,
			elapsed: 0.0,
			duration,
		});
	}

	pub fn focus_node(&mut self, id: &str) -> bool {
		let Some((nx, ny)) = self.position_of(id) else {
			return false;
		};
		let k = self.transform.k.max(FOCUS_ZOOM);
		let to = ViewTransform {
			x: self.width / 2.0 - nx * k,
			y: self.height / 2.0 - ny * k,
			k,
		};
		self.animate_camera(to, FOCUS_SECONDS);
		true
	}

	pub fn zoom_to_fit(&mut self) {
		let positions = self.positions();
		if positions.is_empty() {
			return;
		}
		let bounds = positions.values().fold(
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN),
			|(a, b, c, d), &(x, y)| (a.min(x), b.min(y), c.max(x), d.max(y)),
		);
		let to = fit_transform(bounds, self.width, self.height, FIT_PADDING);
		self.animate_camera(to, FIT_SECONDS);
	}

	/// Pulls the given nodes toward their common centroid; an empty set
	/// removes the pull.
	pub fn set_aggregation(&mut self, ids: &HashSet<String>) {
		self.aggregate = ids.iter().filter_map(|id| self.id_to_idx.get(id).copied()).collect();
		self.animation_running = true;
	}

	fn pull_aggregate(&mut self, dt: f64) {
		if self.aggregate.is_empty() {
			return;
		}
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if self.aggregate.contains(&node.index()) {
				sx += node.x() as f64;
				sy += node.y() as f64;
				n += 1.0;
			}
		});
		if n == 0.0 {
			return;
		}
		let (cx, cy) = (sx / n, sy / n);
		let pull = (AGGREGATE_PULL * dt).min(1.0);
		let members = &self.aggregate;
		self.graph.visit_nodes_mut(|node| {
			if members.contains(&node.index()) && !node.data.is_anchor {
				node.data.x += ((cx - node.data.x as f64) * pull) as f32;
				node.data.y += ((cy - node.data.y as f64) * pull) as f32;
			}
		});
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.pull_aggregate(dt as f64);
		self.flow_time += dt as f64;

		self.ticks = self.ticks.saturating_add(1);
		if !self.fitted && self.ticks >= SETTLE_TICKS {
			self.fitted = true;
			self.zoom_to_fit();
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Advances camera transitions; runs even while the simulation is paused.
	pub fn tick_camera(&mut self, dt: f64) {
		let Some(tween) = self.camera.as_mut() else {
			return;
		};
		tween.elapsed += dt;
		let t = (tween.elapsed / tween.duration).min(1.0);
		let eased = 1.0 - (1.0 - t).powi(3);
		self.transform = tween.from.lerp(&tween.to, eased);
		if t >= 1.0 {
			self.camera = None;
		}
	}

	pub fn stop_camera(&mut self) {
		self.camera = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{GraphLink, GraphNode};

	struct RedNodes;

	impl GraphStyler for RedNodes {
		fn background(&self) -> String {
			"#000".into()
		}
		fn particle_color(&self) -> String {
			"#fff".into()
		}
		fn node_style(&self, id: &str) -> NodeStyle {
			NodeStyle {
				color: "red".into(),
				size: if id == "0" { 16.0 } else { 2.0 },
			}
		}
		fn link_style(&self, _: &str, _: &str) -> LinkStyle {
			LinkStyle {
				color: "blue".into(),
				width: 4.0,
				particles: 4,
			}
		}
	}

	fn square() -> ForceGraphState {
		let data = GraphData {
			nodes: (0..4)
				.map(|i| GraphNode {
					id: i.to_string(),
					label: None,
				})
				.collect(),
			links: vec![
				GraphLink {
					source: "0".into(),
					target: "1".into(),
				},
				GraphLink {
					source: "1".into(),
					target: "missing".into(),
				},
			],
		};
		ForceGraphState::new(&data, 800.0, 600.0)
	}

	#[test]
	fn links_to_unknown_nodes_are_dropped() {
		let state = square();
		assert_eq!(state.node_count(), 4);
		assert_eq!(state.edges.len(), 1);
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = square();
		// node 0 sits at (100, 0) in graph space, the view is centered on the origin
		assert_eq!(state.node_id_at(500.0, 300.0).as_deref(), Some("0"));
		assert_eq!(state.node_id_at(400.0, 300.0), None);
	}

	#[test]
	fn styles_reach_nodes_and_edges() {
		let mut state = square();
		state.apply_styles(&RedNodes);
		assert_eq!(state.background, "#000");
		assert_eq!(state.edges[0].style.particles, 4);
		let mut colors = Vec::new();
		state.graph.visit_nodes(|n| colors.push(n.data.user_data.style.color.clone()));
		assert!(colors.iter().all(|c| c == "red"));
	}

	#[test]
	fn radius_grows_with_cube_root_of_size() {
		assert!((node_radius(2.0) - NODE_RADIUS).abs() < 1e-9);
		assert!((node_radius(16.0) - 2.0 * NODE_RADIUS).abs() < 1e-9);
	}

	#[test]
	fn focus_centers_node() {
		let mut state = square();
		assert!(state.focus_node("0"));
		state.tick_camera(FOCUS_SECONDS);
		let (sx, sy) = (
			100.0 * state.transform.k + state.transform.x,
			0.0 * state.transform.k + state.transform.y,
		);
		assert!((sx - 400.0).abs() < 1e-6 && (sy - 300.0).abs() < 1e-6);
		assert!(!state.focus_node("nope"));
	}

	#[test]
	fn fit_transform_centers_bounds() {
		let t = fit_transform((-100.0, -50.0, 100.0, 50.0), 800.0, 600.0, 100.0);
		assert!((t.k - 3.0).abs() < 1e-9);
		assert!((t.x - 400.0).abs() < 1e-9 && (t.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = square();
		let idx = state.node_at_position(500.0, 300.0).unwrap();
		state.set_hover(Some(idx));
		assert_eq!(state.hover.neighbors.len(), 1);
		state.set_hover(None);
		assert_eq!(state.hover.prev_node, Some(idx));
	}
}
