//! Small canvas charts for the results panel.

mod line;
mod pie;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub use line::LineChart;
pub use pie::PieChart;

fn prepare(canvas: &HtmlCanvasElement, fallback: (f64, f64)) -> Option<(CanvasRenderingContext2d, f64, f64)> {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(fallback);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx = canvas.get_context("2d").ok().flatten()?.dyn_into().ok()?;
	Some((ctx, w, h))
}
