use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::chart::scene::{LinkSprite, NODE_STROKE, NodeSprite};
use crate::chart::{LinkPath, Scene, ViewTransform, Viewport};

const BACKGROUND: &str = "#fafafa";

pub fn render(
	scene: Option<&Scene>,
	transform: ViewTransform,
	viewport: Viewport,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
	let Some(scene) = scene else {
		return;
	};
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	for link in &scene.links {
		draw_link(link, ctx);
	}
	for node in &scene.nodes {
		draw_node(node, ctx);
	}
	ctx.restore();
}

fn draw_link(link: &LinkSprite, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(link.opacity);
	ctx.set_stroke_style_str(link.color);
	ctx.set_line_width(link.width);
	if link.highlighted {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(4.0),
		));
	}

	ctx.begin_path();
	match link.path {
		LinkPath::Line { from, to } => {
			ctx.move_to(from.x, from.y);
			ctx.line_to(to.x, to.y);
		}
		LinkPath::Cubic { from, c1, c2, to } => {
			ctx.move_to(from.x, from.y);
			ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
		}
	}
	ctx.stroke();

	if link.highlighted {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(node: &NodeSprite, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.position.x, node.position.y);
	ctx.set_global_alpha(node.opacity);

	ctx.begin_path();
	let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.fill);
	ctx.fill();
	ctx.set_stroke_style_str(NODE_STROKE);
	ctx.set_line_width(2.0);
	ctx.stroke();

	ctx.set_text_align("center");
	if let Some(avatar) = &node.avatar {
		ctx.set_text_baseline("middle");
		ctx.set_font(avatar.font);
		let _ = ctx.fill_text(&avatar.text, x, y);
	}
	ctx.set_text_baseline("alphabetic");
	for label in &node.labels {
		ctx.set_fill_style_str(label.color);
		ctx.set_font(label.font);
		let _ = ctx.fill_text(&label.text, x, y + label.dy);
	}
	ctx.set_global_alpha(1.0);
}
