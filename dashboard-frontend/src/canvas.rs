use dashboard_shared::ChartSurface;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::NodeRef;

/// A browser canvas as a chart drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Resolve the 2D context of a mounted canvas. `None` if the node is not
    /// mounted yet or is not a canvas.
    pub fn from_node(node: &NodeRef) -> Option<Self> {
        let canvas = node.cast::<HtmlCanvasElement>()?;
        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok()?,
            _ => return None,
        };
        Some(Self { canvas, ctx })
    }
}

impl ChartSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_path(&mut self, points: &[(f64, f64)], color: &str, line_width: f64) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        for &(x, y) in rest {
            self.ctx.line_to(x, y);
        }
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str, font: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(font);
        let _ = self.ctx.fill_text(text, x, y);
    }
}
