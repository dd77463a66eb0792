//! Connector routing between table and function nodes.
//!
//! Every declared input produces a connector `table → function`, every output a
//! connector `function → table`. Paths are cubic S-curves whose control
//! points sit halfway between the endpoints horizontally and level with the
//! start and end respectively, so the curve leaves and enters horizontally:
//!
//! ```text
//! M sx sy C mx sy, mx ey, ex ey      where mx = sx + (ex - sx) / 2
//! ```
//!
//! Routing is pull-based: the router reads anchors from the
//! [`NodeRegistry`] whenever asked to recompute and keeps no subscriptions.

use log::{debug, trace};

use crate::graph::SpecGraph;
use crate::registry::{AnchorSide, NodeKind, NodeRegistry};
use crate::transform::{Point, Transform};

/// Direction of a connector relative to its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    Input,
    Output,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Input => "input",
            ConnectorKind::Output => "output",
        }
    }

    /// Default stroke colour for renderers.
    pub fn color(&self) -> slint::Color {
        match self {
            ConnectorKind::Input => slint::Color::from_rgb_u8(100, 180, 255),
            ConnectorKind::Output => slint::Color::from_rgb_u8(120, 220, 140),
        }
    }
}

/// Cubic S-curve between two anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPath {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl ConnectorPath {
    pub fn between(start: Point, end: Point) -> Self {
        let mid_x = start.x + (end.x - start.x) / 2.0;
        Self {
            start,
            ctrl1: Point::new(mid_x, start.y),
            ctrl2: Point::new(mid_x, end.y),
            end,
        }
    }

    /// The same curve mapped through `transform` (world → screen).
    ///
    /// Affine maps preserve bezier curves, so mapping the four points is exact.
    pub fn to_screen(&self, transform: &Transform) -> Self {
        Self {
            start: transform.world_to_screen(self.start),
            ctrl1: transform.world_to_screen(self.ctrl1),
            ctrl2: transform.world_to_screen(self.ctrl2),
            end: transform.world_to_screen(self.end),
        }
    }

    /// SVG path command string, e.g. `"M 10 20 C 60 20 60 80 110 80"`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.ctrl1.x,
            self.ctrl1.y,
            self.ctrl2.x,
            self.ctrl2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A routed connector between two registry nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: i32,
    pub to: i32,
    pub kind: ConnectorKind,
    pub path: ConnectorPath,
}

impl Connector {
    pub fn touches(&self, node_id: i32) -> bool {
        self.from == node_id || self.to == node_id
    }
}

/// Derives connectors from the graph and keeps their paths in sync with the
/// registry.
#[derive(Debug, Default)]
pub struct ConnectorRouter {
    connectors: Vec<Connector>,
}

impl ConnectorRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn clear(&mut self) {
        self.connectors.clear();
    }

    /// Rebuild every connector from `graph`.
    ///
    /// References to tables or functions without a registry node are skipped
    /// silently.
    pub fn route_all(&mut self, graph: &SpecGraph, registry: &NodeRegistry) {
        self.connectors.clear();
        let mut skipped = 0usize;

        for edge in graph.edges() {
            let table = registry.find(NodeKind::Table, edge.table);
            let function = registry.find(NodeKind::Function, edge.function);
            let (Some(table), Some(function)) = (table, function) else {
                trace!(
                    function = edge.function,
                    table = edge.table,
                    kind = edge.kind.as_str();
                    "Skipping connector with dangling reference"
                );
                skipped += 1;
                continue;
            };

            let (from, to) = match edge.kind {
                ConnectorKind::Input => (table, function),
                ConnectorKind::Output => (function, table),
            };
            if let Some(connector) = route(registry, from, to, edge.kind) {
                self.connectors.push(connector);
            }
        }

        debug!(routed = self.connectors.len(), skipped = skipped; "Connectors routed");
    }

    /// Recompute the paths of connectors touching any of `node_ids`.
    ///
    /// Returns the indices of the connectors that were re-derived.
    pub fn reroute_touching(&mut self, registry: &NodeRegistry, node_ids: &[i32]) -> Vec<usize> {
        let mut rerouted = Vec::new();
        if node_ids.is_empty() {
            return rerouted;
        }

        for (index, connector) in self.connectors.iter_mut().enumerate() {
            if !node_ids.iter().any(|&id| connector.touches(id)) {
                continue;
            }
            if let Some(path) = path_between(registry, connector.from, connector.to) {
                connector.path = path;
                rerouted.push(index);
            }
        }

        trace!(count = rerouted.len(); "Connectors rerouted");
        rerouted
    }
}

fn route(registry: &NodeRegistry, from: i32, to: i32, kind: ConnectorKind) -> Option<Connector> {
    Some(Connector {
        from,
        to,
        kind,
        path: path_between(registry, from, to)?,
    })
}

/// Right-center of the source node to left-center of the destination node.
fn path_between(registry: &NodeRegistry, from: i32, to: i32) -> Option<ConnectorPath> {
    let start = registry.anchor(from, AnchorSide::RightCenter)?;
    let end = registry.anchor(to, AnchorSide::LeftCenter)?;
    Some(ConnectorPath::between(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Node;

    fn graph(yaml: &str) -> SpecGraph {
        SpecGraph::from_yaml(yaml).unwrap()
    }

    /// Table `a` at (100, 50), function `f` at (500, 50), table `b` at (100, 250),
    /// every node 200x100.
    fn setup_registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        let nodes = [
            (1, NodeKind::Table, "a", Point::new(100.0, 50.0)),
            (2, NodeKind::Table, "b", Point::new(100.0, 250.0)),
            (3, NodeKind::Function, "f", Point::new(500.0, 50.0)),
        ];
        for (id, kind, label, position) in nodes {
            registry.insert(Node::new(id, kind, label, vec![], position, (200.0, 100.0)));
        }
        registry
    }

    const A_F_B: &str = "tables:\n  a: {columns: []}\n  b: {columns: []}\n\
                         functions:\n  f: {inputs: [a], outputs: [b]}\n";

    // ========================================================================
    // ConnectorPath
    // ========================================================================

    #[test]
    fn test_path_control_points_midway() {
        let path = ConnectorPath::between(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        assert_eq!(path.ctrl1, Point::new(100.0, 0.0));
        assert_eq!(path.ctrl2, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_path_backwards_flow() {
        // End left of start: control points still sit halfway.
        let path = ConnectorPath::between(Point::new(300.0, 10.0), Point::new(100.0, 90.0));
        assert_eq!(path.ctrl1, Point::new(200.0, 10.0));
        assert_eq!(path.ctrl2, Point::new(200.0, 90.0));
    }

    #[test]
    fn test_path_svg_format() {
        let path = ConnectorPath::between(Point::new(10.0, 20.0), Point::new(110.0, 80.0));
        assert_eq!(path.to_svg(), "M 10 20 C 60 20 60 80 110 80");
    }

    #[test]
    fn test_path_negative_coords() {
        let path = ConnectorPath::between(Point::new(-100.0, -50.0), Point::new(100.0, 50.0));
        assert_eq!(path.to_svg(), "M -100 -50 C 0 -50 0 50 100 50");
    }

    #[test]
    fn test_path_to_screen() {
        let path = ConnectorPath::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let screen = path.to_screen(&Transform::new(50.0, 50.0, 2.0));
        assert_eq!(screen.start, Point::new(50.0, 50.0));
        assert_eq!(screen.ctrl1, Point::new(150.0, 50.0));
        assert_eq!(screen.end, Point::new(250.0, 50.0));
    }

    // ========================================================================
    // ConnectorRouter::route_all()
    // ========================================================================

    #[test]
    fn test_route_all_input_and_output() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph(A_F_B), &registry);

        assert_eq!(router.len(), 2);
        let input = &router.connectors()[0];
        assert_eq!((input.from, input.to, input.kind), (1, 3, ConnectorKind::Input));
        // a.rightCenter -> f.leftCenter
        assert_eq!(input.path.start, Point::new(300.0, 100.0));
        assert_eq!(input.path.end, Point::new(500.0, 100.0));

        let output = &router.connectors()[1];
        assert_eq!((output.from, output.to, output.kind), (3, 2, ConnectorKind::Output));
        // f.rightCenter -> b.leftCenter
        assert_eq!(output.path.start, Point::new(700.0, 100.0));
        assert_eq!(output.path.end, Point::new(100.0, 300.0));
    }

    #[test]
    fn test_route_all_skips_dangling_table() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(
            &graph("tables:\n  a: {}\nfunctions:\n  f: {inputs: [a, c]}\n"),
            &registry,
        );
        assert_eq!(router.len(), 1);
        assert_eq!(router.connectors()[0].from, 1);
    }

    #[test]
    fn test_route_all_skips_missing_function_node() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph("functions:\n  g: {inputs: [a]}\n"), &registry);
        assert!(router.is_empty());
    }

    #[test]
    fn test_route_all_keeps_duplicates() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph("functions:\n  f: {inputs: [a, a]}\n"), &registry);
        assert_eq!(router.len(), 2);
        assert_eq!(router.connectors()[0], router.connectors()[1]);
    }

    #[test]
    fn test_route_all_replaces_previous() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph(A_F_B), &registry);
        router.route_all(&graph(A_F_B), &registry);
        assert_eq!(router.len(), 2);
    }

    // ========================================================================
    // ConnectorRouter::reroute_touching()
    // ========================================================================

    #[test]
    fn test_reroute_touching_only_affected() {
        let mut registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph(A_F_B), &registry);
        let output_before = router.connectors()[1].clone();

        registry.move_node(1, Point::new(0.0, 0.0));
        let rerouted = router.reroute_touching(&registry, &[1]);

        assert_eq!(rerouted, [0]);
        assert_eq!(router.connectors()[0].path.start, Point::new(200.0, 50.0));
        assert_eq!(router.connectors()[1], output_before);
    }

    #[test]
    fn test_reroute_touching_function_updates_both() {
        let mut registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph(A_F_B), &registry);

        registry.move_node(3, Point::new(600.0, 0.0));
        let rerouted = router.reroute_touching(&registry, &[3]);

        assert_eq!(rerouted, [0, 1]);
        assert_eq!(router.connectors()[0].path.end, Point::new(600.0, 50.0));
        assert_eq!(router.connectors()[1].path.start, Point::new(800.0, 50.0));
    }

    #[test]
    fn test_reroute_touching_nothing() {
        let registry = setup_registry();
        let mut router = ConnectorRouter::new();
        router.route_all(&graph(A_F_B), &registry);
        assert!(router.reroute_touching(&registry, &[]).is_empty());
        assert!(router.reroute_touching(&registry, &[99]).is_empty());
    }
}
