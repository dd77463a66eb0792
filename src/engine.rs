//! The diagram engine: layout, registry, routing and interaction behind one
//! owned value.
//!
//! A host drives the engine with pointer and wheel events in **screen space**
//! (relative to the canvas) and reads a [`DiagramSnapshot`] to draw. Each
//! event is processed completely, including connector recomputation, before
//! the call returns.
//!
//! ```ignore
//! let mut engine = DiagramEngine::new(CanvasConfig::default());
//! engine.rebuild(&graph);
//! engine.pointer_down(170.0, 120.0);
//! engine.pointer_move(220.0, 140.0);
//! engine.pointer_up();
//! let snapshot = engine.snapshot();
//! ```

use log::debug;

use crate::config::CanvasConfig;
use crate::graph::SpecGraph;
use crate::interaction::{InteractionController, InteractionState, PointerUpdate};
use crate::layout::populate;
use crate::registry::{Node, NodeRegistry};
use crate::router::{Connector, ConnectorRouter};
use crate::transform::{Point, Transform};

/// Read-only view of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSnapshot {
    pub transform: Transform,
    /// Nodes in paint order, world space.
    pub nodes: Vec<Node>,
    /// Connectors with world-space paths.
    pub connectors: Vec<Connector>,
    /// Node currently being dragged, drawn above all others.
    pub raised: Option<i32>,
}

impl DiagramSnapshot {
    pub fn zoom_percent(&self) -> i32 {
        self.transform.zoom_percent()
    }
}

#[derive(Debug)]
pub struct DiagramEngine {
    config: CanvasConfig,
    registry: NodeRegistry,
    router: ConnectorRouter,
    interaction: InteractionController,
    built: bool,
    last_rerouted: Vec<usize>,
}

impl Default for DiagramEngine {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl DiagramEngine {
    pub fn new(config: CanvasConfig) -> Self {
        let interaction = InteractionController::new(config.default_transform, config.zoom);
        Self {
            config,
            registry: NodeRegistry::new(),
            router: ConnectorRouter::new(),
            interaction,
            built: false,
            last_rerouted: Vec::new(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Whether a layout has run since the last [`clear`](Self::clear).
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Lay out `graph` and route all connectors, replacing any previous diagram.
    ///
    /// The transform is left alone; [`clear`](Self::clear) resets it.
    pub fn rebuild(&mut self, graph: &SpecGraph) {
        self.interaction.pointer_up();
        populate(&mut self.registry, graph, &self.config.layout);
        self.router.route_all(graph, &self.registry);
        self.last_rerouted.clear();
        self.built = true;
        debug!(
            nodes = self.registry.len(),
            connectors = self.router.len();
            "Diagram rebuilt"
        );
    }

    /// Discard nodes and connectors and reset the transform.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.router.clear();
        self.interaction.reset();
        self.last_rerouted.clear();
        self.built = false;
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.interaction.set_viewport_size(width, height);
    }

    // === Pointer and wheel input (screen space) ===

    pub fn pointer_down(&mut self, x: f32, y: f32) -> InteractionState {
        self.interaction.pointer_down(Point::new(x, y), &self.registry)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> PointerUpdate {
        let update = self.interaction.pointer_move(Point::new(x, y), &mut self.registry);
        if let PointerUpdate::NodeMoved(_) = update {
            self.refresh_connectors();
        }
        update
    }

    pub fn pointer_up(&mut self) -> bool {
        self.interaction.pointer_up()
    }

    /// Handle a wheel notch at the cursor. Returns `true` if the view zoomed.
    pub fn wheel(&mut self, x: f32, y: f32, delta_y: f32) -> bool {
        self.interaction.wheel(Point::new(x, y), delta_y)
    }

    // === Zoom controls ===

    /// Apply a zoom delta anchored at a screen point.
    pub fn zoom_at(&mut self, x: f32, y: f32, delta: f32) -> bool {
        self.interaction.zoom_at(Point::new(x, y), delta)
    }

    /// Apply a zoom delta anchored at the viewport center.
    pub fn zoom(&mut self, delta: f32) -> bool {
        self.interaction.zoom_centered(delta)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.interaction.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.interaction.zoom_out()
    }

    pub fn reset_zoom(&mut self) {
        self.interaction.reset_zoom();
    }

    // === Geometry ===

    /// Record a renderer-measured node size and re-derive its connectors.
    pub fn report_node_size(&mut self, id: i32, width: f32, height: f32) -> bool {
        let changed = self.registry.resize_node(id, width, height);
        if changed {
            self.refresh_connectors();
        }
        changed
    }

    /// Re-derive connectors touching nodes moved since the last refresh.
    ///
    /// Returns the indices of the re-derived connectors.
    pub fn refresh_connectors(&mut self) -> &[usize] {
        let moved = self.registry.take_moved();
        self.last_rerouted = self.router.reroute_touching(&self.registry, &moved);
        &self.last_rerouted
    }

    /// Connector indices re-derived by the most recent refresh.
    pub fn last_rerouted(&self) -> &[usize] {
        &self.last_rerouted
    }

    // === Accessors ===

    pub fn transform(&self) -> Transform {
        self.interaction.transform()
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn connectors(&self) -> &[Connector] {
        self.router.connectors()
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            transform: self.transform(),
            nodes: self.registry.iter().cloned().collect(),
            connectors: self.router.connectors().to_vec(),
            raised: self.state().dragged_node(),
        }
    }
}
