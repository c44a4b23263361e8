use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, node_radius};

/// Fraction of a link a particle travels per second.
const PARTICLE_SPEED: f64 = 0.6;
const PARTICLE_RADIUS: f64 = 2.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Offset along a link, in `[0, 1)`, of particle `i` out of `n`.
pub fn particle_offset(flow_time: f64, i: u32, n: u32) -> f64 {
	if n == 0 {
		return 0.0;
	}
	(flow_time * PARTICLE_SPEED + i as f64 / n as f64).rem_euclid(1.0)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let positions = state.positions();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		if (dx * dx + dy * dy).sqrt() < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
		let alpha = match (has_highlight, is_highlighted) {
			(false, _) => 1.0,
			(true, true) => 1.0,
			(true, false) => 1.0 - 0.75 * t,
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&edge.style.color);
		ctx.set_line_width(edge.style.width / k.max(0.5));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		if edge.style.particles > 0 {
			ctx.set_fill_style_str(&state.particle_color);
			for i in 0..edge.style.particles {
				let p = particle_offset(state.flow_time, i, edge.style.particles);
				ctx.begin_path();
				let _ = ctx.arc(x1 + dx * p, y1 + dy * p, PARTICLE_RADIUS / k.max(0.5), 0.0, 2.0 * PI);
				ctx.fill();
			}
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let style = &node.data.user_data.style;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let alpha = if has_highlight { 1.0 - 0.7 * t } else { 1.0 };

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, node_radius(style.size), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let base = node_radius(info.style.size);

		let (radius, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.style.color);
		ctx.fill();

		if is_hovered {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();

			let text = info.label.as_deref().unwrap_or(&info.id);
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.4 + 0.6 * t));
			ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
			let _ = ctx.fill_text(&format!("Node {text}"), x + radius + 4.0 / k, y + 4.0 / k);
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn particles_are_evenly_spaced_and_wrap() {
		assert_eq!(particle_offset(0.0, 0, 4), 0.0);
		assert!((particle_offset(0.0, 2, 4) - 0.5).abs() < 1e-9);
		let late = particle_offset(10.0, 3, 4);
		assert!((0.0..1.0).contains(&late));
		assert_eq!(particle_offset(1.0, 0, 0), 0.0);
	}
}
