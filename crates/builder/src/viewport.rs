use glam::Vec2;
use node::{CanvasDelta, CanvasPoint, ScreenPoint};
use serde::{Deserialize, Serialize};

/// Camera/viewport state for the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in canvas coordinates
    pub offset: Vec2,
    /// Zoom level (1.0 = 100%)
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewport whose starting zoom already sits inside the limits.
    pub fn with_zoom_limits(min_zoom: f32, max_zoom: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: Self::home_zoom(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// 100%, pulled into `[min_zoom, max_zoom]`. Never panics on inverted limits.
    fn home_zoom(min_zoom: f32, max_zoom: f32) -> f32 {
        1.0_f32.max(min_zoom).min(max_zoom)
    }

    /// Convert a point from screen coordinates to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: ScreenPoint) -> CanvasPoint {
        CanvasPoint(screen.0 / self.zoom - self.offset)
    }

    /// Convert a point from canvas coordinates to screen coordinates.
    pub fn canvas_to_screen(&self, canvas: CanvasPoint) -> ScreenPoint {
        ScreenPoint((canvas.0 + self.offset) * self.zoom)
    }

    /// Pointer movement between two screen samples, in canvas units.
    pub fn screen_delta_to_canvas(&self, from: ScreenPoint, to: ScreenPoint) -> CanvasDelta {
        CanvasDelta((to.0 - from.0) / self.zoom)
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta / self.zoom;
    }

    /// Zoom the viewport, keeping a screen point fixed.
    pub fn zoom_at(&mut self, screen: ScreenPoint, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);

        // Keep the point under the cursor fixed
        if self.zoom != old_zoom {
            self.offset = screen.0 / self.zoom - (screen.0 / old_zoom - self.offset);
        }
    }

    /// Reset to default view.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = Self::home_zoom(self.min_zoom, self.max_zoom);
    }
}
