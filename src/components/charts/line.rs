use std::f64::consts::PI;

use leptos::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::analysis::metrics::Series;

const PAD_LEFT: f64 = 48.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 24.0;
const PAD_BOTTOM: f64 = 34.0;

/// Smallest 1/2/5 × 10^n at or above `v`, for a readable axis maximum.
pub fn nice_ceiling(v: u64) -> u64 {
	if v <= 1 {
		return 1;
	}
	let mut magnitude = 1u64;
	while let Some(next) = magnitude.checked_mul(10).filter(|&n| n < v) {
		magnitude = next;
	}
	[1u64, 2, 5, 10]
		.into_iter()
		.filter_map(|m| m.checked_mul(magnitude))
		.find(|&c| c >= v)
		.unwrap_or(v)
}

pub fn plot_points(series: &Series, w: f64, h: f64) -> Vec<(f64, f64)> {
	let max_x = series.iter().map(|&(x, _)| x).max().unwrap_or(0).max(1) as f64;
	let max_y = nice_ceiling(series.iter().map(|&(_, y)| y).max().unwrap_or(0)) as f64;
	let (pw, ph) = (w - PAD_LEFT - PAD_RIGHT, h - PAD_TOP - PAD_BOTTOM);
	series
		.iter()
		.map(|&(x, y)| (PAD_LEFT + x as f64 / max_x * pw, PAD_TOP + ph - y as f64 / max_y * ph))
		.collect()
}

fn draw(ctx: &CanvasRenderingContext2d, w: f64, h: f64, series: &Series, color: &str, y_label: &str, text: &str) {
	ctx.clear_rect(0.0, 0.0, w, h);
	let (x0, y0, x1) = (PAD_LEFT, h - PAD_BOTTOM, w - PAD_RIGHT);
	let max_y = nice_ceiling(series.iter().map(|&(_, y)| y).max().unwrap_or(0));

	ctx.set_stroke_style_str(text);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(x0, PAD_TOP);
	ctx.line_to(x0, y0);
	ctx.line_to(x1, y0);
	ctx.stroke();

	ctx.set_fill_style_str(text);
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text(&max_y.to_string(), 4.0, PAD_TOP + 4.0);
	let _ = ctx.fill_text("0", x0 - 14.0, y0 + 4.0);
	let _ = ctx.fill_text(y_label, x0, 14.0);
	let _ = ctx.fill_text("Simulation Step", (x0 + x1) / 2.0 - 40.0, h - 6.0);

	let points = plot_points(series, w, h);
	let (Some(first), Some(last)) = (points.first(), points.last()) else {
		return;
	};

	ctx.begin_path();
	ctx.move_to(first.0, y0);
	for &(x, y) in &points {
		ctx.line_to(x, y);
	}
	ctx.line_to(last.0, y0);
	ctx.close_path();
	ctx.set_global_alpha(0.25);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_global_alpha(1.0);

	ctx.begin_path();
	ctx.move_to(first.0, first.1);
	for &(x, y) in &points[1..] {
		ctx.line_to(x, y);
	}
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(2.0);
	ctx.stroke();

	for (&(x, y), &(step, _)) in points.iter().zip(series) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, 4.0, 0.0, 2.0 * PI);
		ctx.fill();
		ctx.set_fill_style_str(text);
		let _ = ctx.fill_text(&step.to_string(), x - 3.0, y0 + 14.0);
		ctx.set_fill_style_str(color);
	}
}

#[component]
pub fn LineChart(
	title: &'static str,
	y_label: &'static str,
	series: Series,
	color: &'static str,
	#[prop(into)] dark: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let text = if dark.get() { "#cccccc" } else { "#666666" };
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some((ctx, w, h)) = super::prepare(&canvas, (320.0, 220.0)) {
			draw(&ctx, w, h, &series, color, y_label, text);
		}
	});

	view! {
		<div class="chart">
			<div class="chart-title">{title}</div>
			<div class="chart-body">
				<canvas node_ref=canvas_ref />
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ceilings_round_up_to_readable_steps() {
		assert_eq!(nice_ceiling(0), 1);
		assert_eq!(nice_ceiling(7), 10);
		assert_eq!(nice_ceiling(11), 20);
		assert_eq!(nice_ceiling(437), 500);
		assert_eq!(nice_ceiling(1000), 1000);
	}

	#[test]
	fn huge_values_keep_their_own_ceiling() {
		assert_eq!(nice_ceiling(u64::MAX), u64::MAX);
		assert_eq!(nice_ceiling(15_000_000_000_000_000_000), 15_000_000_000_000_000_000);
		assert_eq!(nice_ceiling(3_000_000_000_000_000_000), 5_000_000_000_000_000_000);
	}

	#[test]
	fn points_span_plot_area() {
		let pts = plot_points(&vec![(0, 0), (1, 5), (2, 10)], 200.0, 100.0);
		assert_eq!(pts[0], (PAD_LEFT, 100.0 - PAD_BOTTOM));
		assert_eq!(pts[2], (200.0 - PAD_RIGHT, PAD_TOP));
	}
}
