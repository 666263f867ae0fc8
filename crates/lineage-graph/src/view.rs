use crate::{Vec2, ViewSettings};
use serde::{Deserialize, Serialize};

/// `translate(pan_x, pan_y) · scale(scale)` applied to the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        pan_x: 0.0,
        pan_y: 0.0,
        scale: 1.0,
    };

    pub fn pan(&self) -> Vec2 {
        Vec2::new(self.pan_x, self.pan_y)
    }

    /// Scene coordinates to canvas coordinates.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x * self.scale + self.pan_x,
            world.y * self.scale + self.pan_y,
        )
    }

    /// Canvas coordinates back to scene coordinates.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.pan_x) / self.scale,
            (screen.y - self.pan_y) / self.scale,
        )
    }
}

/// An active press on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Where the pointer went down, in canvas pixels.
    pub start: Vec2,
    /// Pan at the time of the press.
    pub origin: Vec2,
    /// Set once the pointer travels past the drag threshold.
    pub committed: bool,
}

/// Pan and zoom state for one canvas. Owns no graph data.
#[derive(Debug, Clone)]
pub struct ViewController {
    settings: ViewSettings,
    transform: Transform,
    viewport: Vec2,
    drag: Option<DragState>,
    suppress_click: bool,
}

impl ViewController {
    pub fn new(settings: &ViewSettings) -> Self {
        Self {
            viewport: Vec2::new(
                settings.default_viewport_width,
                settings.default_viewport_height,
            ),
            settings: settings.clone(),
            transform: Transform::IDENTITY,
            drag: None,
            suppress_click: false,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Non-positive sizes are ignored and the previous viewport is kept.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        } else {
            tracing::debug!("Ignoring viewport size {}x{}", width, height);
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.transform.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.transform.world_to_screen(world)
    }

    /// Cursor-anchored zoom. The scene point under `cursor` stays under it.
    /// Returns whether the scale changed.
    pub fn zoom_at(&mut self, cursor: Vec2, delta: f32) -> bool {
        if !delta.is_finite() {
            tracing::debug!("Ignoring non-finite zoom delta {}", delta);
            return false;
        }
        let old_scale = self.transform.scale;
        let factor = (-delta * self.settings.zoom_intensity).exp();
        let new_scale = (old_scale * factor).clamp(self.settings.min_scale, self.settings.max_scale);

        if (new_scale - old_scale).abs() < 1e-6 {
            return false;
        }

        let anchor = self.transform.screen_to_world(cursor);
        self.transform.scale = new_scale;
        self.transform.pan_x = cursor.x - anchor.x * new_scale;
        self.transform.pan_y = cursor.y - anchor.y * new_scale;
        true
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform.pan_x += dx;
        self.transform.pan_y += dy;
    }

    pub fn reset_zoom(&mut self) {
        self.transform = Transform::IDENTITY;
    }

    /// Puts `world` at the middle of the viewport without changing the scale.
    pub fn center_on(&mut self, world: Vec2) {
        let scale = self.transform.scale;
        self.transform.pan_x = self.viewport.x / 2.0 - world.x * scale;
        self.transform.pan_y = self.viewport.y / 2.0 - world.y * scale;
    }

    pub fn pointer_down(&mut self, point: Vec2) {
        self.drag = Some(DragState {
            start: point,
            origin: self.transform.pan(),
            committed: false,
        });
        self.suppress_click = false;
    }

    /// Pans with the pointer once the press has become a drag.
    /// Returns whether the transform changed.
    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        let threshold = self.settings.drag_threshold;
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };

        let offset = point - drag.start;
        if !drag.committed {
            if offset.length() <= threshold {
                return false;
            }
            drag.committed = true;
        }

        self.transform.pan_x = drag.origin.x + offset.x;
        self.transform.pan_y = drag.origin.y + offset.y;
        true
    }

    /// Ends the press. A committed drag suppresses the click that follows.
    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.suppress_click = drag.committed;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|drag| drag.committed)
    }

    /// Whether a click arriving now should select something. Consumes the
    /// suppression left by a finished drag.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }
}
