use core::f64::consts::TAU;

use fish_core::{DrawingSurface, Viewport};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Canvas 2D context as a fish drawing surface
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        context.set_line_cap("round");
        Self { context }
    }

    /// Map logical (CSS pixel) coordinates onto a backing store that is
    /// `ratio` times larger.
    pub fn set_pixel_ratio(&self, ratio: f64) -> Result<(), JsValue> {
        self.context.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)?;
        // Resizing the canvas resets context state
        self.context.set_line_cap("round");
        Ok(())
    }
}

impl DrawingSurface for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self, viewport: Viewport) {
        self.context.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.context.translate(x, y)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        self.context.rotate(angle)
    }

    fn set_fill_color(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.context.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.context.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) -> Result<(), JsValue> {
        self.context.ellipse(x, y, rx, ry, 0.0, 0.0, TAU)
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }
}
