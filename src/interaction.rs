//! Pointer and wheel state machine.
//!
//! ```text
//!            down on node                      down on canvas
//!   Idle ───────────────▶ DraggingNode   Idle ───────────────▶ Panning
//!    ▲                        │            ▲                      │
//!    └──────── up ────────────┘            └──────── up ──────────┘
//! ```
//!
//! Only one pointer is modelled. The wheel zooms around the cursor while
//! `Idle` and is swallowed (but still consumed) during a drag or pan.

use log::trace;

use crate::config::ZoomConfig;
use crate::registry::NodeRegistry;
use crate::transform::{Point, Transform, TransformModel};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// `grab_offset` is screen space: pointer minus pan at grab time.
    Panning { grab_offset: Point },
    /// `grab_offset` is world space: pointer minus node position at grab time.
    DraggingNode { node_id: i32, grab_offset: Point },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn dragged_node(&self) -> Option<i32> {
        match self {
            InteractionState::DraggingNode { node_id, .. } => Some(*node_id),
            _ => None,
        }
    }
}

/// What a pointer-move changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpdate {
    Ignored,
    Panned,
    NodeMoved(i32),
}

/// Owns the view transform and the transient interaction state.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    transform: TransformModel,
    zoom: ZoomConfig,
    viewport: (f32, f32),
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(Transform::default(), ZoomConfig::default())
    }
}

impl InteractionController {
    pub fn new(default_transform: Transform, zoom: ZoomConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            transform: TransformModel::new(default_transform, zoom.limits),
            zoom,
            viewport: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn transform(&self) -> Transform {
        self.transform.current()
    }

    pub fn transform_model(&self) -> &TransformModel {
        &self.transform
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport.0 / 2.0, self.viewport.1 / 2.0)
    }

    /// Start a node drag if the pointer is over a node, otherwise start panning.
    pub fn pointer_down(&mut self, screen: Point, registry: &NodeRegistry) -> InteractionState {
        let world = self.transform.screen_to_world(screen);

        self.state = match registry.node_at(world).and_then(|id| registry.get(id)) {
            Some(node) => InteractionState::DraggingNode {
                node_id: node.id,
                grab_offset: world - node.position,
            },
            None => InteractionState::Panning {
                grab_offset: screen - self.transform.current().pan(),
            },
        };

        trace!(state:? = self.state; "Pointer down");
        self.state
    }

    /// Apply a pointer move to the active drag or pan.
    pub fn pointer_move(&mut self, screen: Point, registry: &mut NodeRegistry) -> PointerUpdate {
        match self.state {
            InteractionState::Idle => PointerUpdate::Ignored,
            InteractionState::Panning { grab_offset } => {
                self.transform.set_pan(screen - grab_offset);
                PointerUpdate::Panned
            }
            InteractionState::DraggingNode { node_id, grab_offset } => {
                let world = self.transform.screen_to_world(screen);
                if registry.move_node(node_id, world - grab_offset) {
                    PointerUpdate::NodeMoved(node_id)
                } else {
                    // Node vanished under the drag (diagram reset); stop dragging.
                    self.state = InteractionState::Idle;
                    PointerUpdate::Ignored
                }
            }
        }
    }

    /// End any drag or pan. Returns `true` if one was active.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = !self.state.is_idle();
        self.state = InteractionState::Idle;
        was_active
    }

    /// Zoom one wheel notch around the cursor.
    ///
    /// `delta_y > 0` (scrolling down) zooms out, `delta_y < 0` zooms in and
    /// `0` does nothing. Returns `true` if the transform changed. The event
    /// should always be consumed by the host so the page does not scroll.
    pub fn wheel(&mut self, cursor: Point, delta_y: f32) -> bool {
        if !self.state.is_idle() {
            trace!(state:? = self.state; "Wheel ignored during active interaction");
            return false;
        }

        let delta = if delta_y > 0.0 {
            -self.zoom.wheel_step
        } else if delta_y < 0.0 {
            self.zoom.wheel_step
        } else {
            0.0
        };
        self.zoom_at(cursor, delta)
    }

    /// Zoom by `delta` keeping the screen point `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, delta: f32) -> bool {
        self.transform.zoom_at(anchor, delta)
    }

    /// Zoom by `delta` around the viewport center.
    pub fn zoom_centered(&mut self, delta: f32) -> bool {
        self.zoom_at(self.viewport_center(), delta)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_centered(self.zoom.button_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_centered(-self.zoom.button_step)
    }

    /// Restore the default transform, keeping any active interaction.
    pub fn reset_zoom(&mut self) {
        self.transform.reset();
    }

    /// Restore the default transform and drop any active interaction.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.transform.reset();
    }
}
