//! Pan/zoom state and screen ↔ world coordinate conversion.
//!
//! Node geometry lives in **world space** and is invariant to pan/zoom. The
//! renderer draws everything through a single [`Transform`]:
//!
//! ```text
//! screen = world * scale + pan
//! world  = (screen - pan) / scale
//! ```

use serde::Deserialize;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Inclusive scale limits applied on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleLimits {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
        }
    }
}

impl ScaleLimits {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Pan offset and zoom scale of the diagram view.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pan_x: 50.0,
            pan_y: 50.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new(pan_x: f32, pan_y: f32, scale: f32) -> Self {
        Self { pan_x, pan_y, scale }
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.scale,
            (screen.y - self.pan_y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan_x,
            world.y * self.scale + self.pan_y,
        )
    }

    /// Zoom percentage for a zoom label, e.g. `150` for a scale of 1.5.
    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }
}

/// Owns the live [`Transform`] and enforces the scale limits.
#[derive(Debug, Clone)]
pub struct TransformModel {
    current: Transform,
    default: Transform,
    limits: ScaleLimits,
}

impl Default for TransformModel {
    fn default() -> Self {
        Self::new(Transform::default(), ScaleLimits::default())
    }
}

impl TransformModel {
    /// Create a model starting at `default`, which is also what [`reset`](Self::reset) restores.
    pub fn new(default: Transform, limits: ScaleLimits) -> Self {
        let default = Transform {
            scale: limits.clamp(default.scale),
            ..default
        };
        Self {
            current: default,
            default,
            limits,
        }
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.current.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.current.world_to_screen(world)
    }

    /// Set the pan offset directly (1:1 screen-space panning).
    pub fn set_pan(&mut self, pan: Point) {
        self.current.pan_x = pan.x;
        self.current.pan_y = pan.y;
    }

    /// Change the scale by `delta` while keeping the world point under `anchor`
    /// (screen space) fixed on screen.
    ///
    /// Returns `true` if the transform changed.
    pub fn zoom_at(&mut self, anchor: Point, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }

        let world = self.current.screen_to_world(anchor);
        let new_scale = self.limits.clamp(self.current.scale + delta);
        if new_scale == self.current.scale {
            return false;
        }

        self.current.scale = new_scale;
        self.current.pan_x = anchor.x - world.x * new_scale;
        self.current.pan_y = anchor.y - world.y * new_scale;
        true
    }

    pub fn reset(&mut self) {
        self.current = self.default;
    }
}
