use std::f64::consts::PI;

use leptos::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::analysis::metrics::PieSlice;

/// Vertical center and radius, both as fractions of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieLayout {
	pub center_y: f64,
	pub radius: f64,
}

pub fn pie_layout(slice_count: usize) -> PieLayout {
	match slice_count {
		0..=3 => PieLayout {
			center_y: 0.45,
			radius: 0.65,
		},
		4 => PieLayout {
			center_y: 0.40,
			radius: 0.55,
		},
		_ => PieLayout {
			center_y: 0.33,
			radius: 0.45,
		},
	}
}

/// Start and end angles per slice, clockwise from twelve o'clock. Empty
/// slices get a zero-width arc.
pub fn slice_angles(slices: &[PieSlice]) -> Vec<(f64, f64)> {
	let total: u64 = slices.iter().map(|s| s.value).sum();
	let mut start = -PI / 2.0;
	slices
		.iter()
		.map(|s| {
			let sweep = if total == 0 {
				0.0
			} else {
				s.value as f64 / total as f64 * 2.0 * PI
			};
			let arc = (start, start + sweep);
			start += sweep;
			arc
		})
		.collect()
}

fn draw(ctx: &CanvasRenderingContext2d, w: f64, h: f64, slices: &[PieSlice], text: &str) {
	ctx.clear_rect(0.0, 0.0, w, h);
	let layout = pie_layout(slices.len());
	let (cx, cy) = (w / 2.0, h * layout.center_y);
	let r = w.min(h) / 2.0 * layout.radius;
	let total: u64 = slices.iter().map(|s| s.value).sum();

	ctx.set_font("11px sans-serif");
	for (slice, (a0, a1)) in slices.iter().zip(slice_angles(slices)) {
		if a1 <= a0 {
			continue;
		}
		ctx.begin_path();
		ctx.move_to(cx, cy);
		let _ = ctx.arc(cx, cy, r, a0, a1);
		ctx.close_path();
		ctx.set_fill_style_str(slice.color);
		ctx.fill();

		let mid = (a0 + a1) / 2.0;
		let (lx, ly) = (cx + (r + 14.0) * mid.cos(), cy + (r + 14.0) * mid.sin());
		ctx.set_text_align(if mid.cos() >= 0.0 { "left" } else { "right" });
		ctx.set_fill_style_str(text);
		let pct = slice.value as f64 / total as f64 * 100.0;
		let _ = ctx.fill_text(&format!("{} {} ({:.1}%)", slice.label, slice.value, pct), lx, ly);
	}
	ctx.set_text_align("start");
}

#[component]
pub fn PieChart(title: &'static str, slices: Vec<PieSlice>, #[prop(into)] dark: Signal<bool>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let legend = slices.clone();

	Effect::new(move |_| {
		let text = if dark.get() { "#eeeeee" } else { "#555555" };
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some((ctx, w, h)) = super::prepare(&canvas, (320.0, 260.0)) {
			draw(&ctx, w, h, &slices, text);
		}
	});

	view! {
		<div class="chart">
			<div class="chart-title">{title}</div>
			<div class="chart-body">
				<canvas node_ref=canvas_ref />
			</div>
			<div class="chart-legend">
				{legend
					.into_iter()
					.map(|s| {
						view! {
							<span class="chart-legend-item">
								<span class="swatch" style:background-color=s.color></span>
								{s.label}
							</span>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn slice(value: u64) -> PieSlice {
		PieSlice {
			label: "x",
			value,
			color: "#000",
		}
	}

	#[test]
	fn layout_shrinks_with_more_slices() {
		assert_eq!(pie_layout(3), pie_layout(1));
		assert_eq!(pie_layout(4).radius, 0.55);
		assert_eq!(pie_layout(5), pie_layout(9));
		assert!(pie_layout(5).center_y < pie_layout(4).center_y);
	}

	#[test]
	fn angles_cover_full_circle_in_order() {
		let arcs = slice_angles(&[slice(1), slice(0), slice(3)]);
		assert!((arcs[0].0 + PI / 2.0).abs() < 1e-9);
		assert_eq!(arcs[1].0, arcs[1].1);
		assert!((arcs[2].1 - arcs[0].0 - 2.0 * PI).abs() < 1e-9);
		assert!((arcs[0].1 - arcs[0].0 - PI / 2.0).abs() < 1e-9);
	}

	#[test]
	fn all_zero_slices_draw_nothing() {
		assert!(slice_angles(&[slice(0), slice(0)]).iter().all(|(a, b)| a == b));
	}
}
