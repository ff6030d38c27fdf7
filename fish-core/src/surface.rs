//! The 2D drawing surface the flock renders onto.
//!
//! The method set mirrors a canvas 2D context. Only the operations a host
//! can actually fail on (transforms and ellipses on a lost context) return
//! a `Result`; a failed frame ends the animation loop.

use crate::flock::Viewport;

pub trait DrawingSurface {
    type Error: core::fmt::Debug;

    fn clear(&mut self, viewport: Viewport);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn rotate(&mut self, angle: f64) -> Result<(), Self::Error>;
    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    /// Full ellipse centred at `(x, y)` with radii `(rx, ry)`
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) -> Result<(), Self::Error>;
    fn fill(&mut self);
    fn stroke(&mut self);
}

/// A recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Viewport),
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    FillColor(String),
    StrokeColor(String),
    LineWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadraticCurveTo(f64, f64, f64, f64),
    Ellipse(f64, f64, f64, f64),
    Fill,
    Stroke,
}

/// Returned by a detached [`RecordingSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLost;

/// Surface that records every command instead of drawing.
///
/// Used by headless runs and tests. Calling [`RecordingSurface::detach`]
/// makes the fallible operations fail, like a torn-down canvas context.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    detached: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop recorded commands, e.g. between frames
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }

    pub fn clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count()
    }

    pub fn detach(&mut self) {
        self.detached = true;
    }

    fn check(&self) -> Result<(), SurfaceLost> {
        if self.detached {
            Err(SurfaceLost)
        } else {
            Ok(())
        }
    }
}

impl DrawingSurface for RecordingSurface {
    type Error = SurfaceLost;

    fn clear(&mut self, viewport: Viewport) {
        self.ops.push(DrawOp::Clear(viewport));
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceLost> {
        self.check()?;
        self.ops.push(DrawOp::Translate(x, y));
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<(), SurfaceLost> {
        self.check()?;
        self.ops.push(DrawOp::Rotate(angle));
        Ok(())
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ops.push(DrawOp::FillColor(color.to_string()));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ops.push(DrawOp::QuadraticCurveTo(cpx, cpy, x, y));
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) -> Result<(), SurfaceLost> {
        self.check()?;
        self.ops.push(DrawOp::Ellipse(x, y, rx, ry));
        Ok(())
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }
}
