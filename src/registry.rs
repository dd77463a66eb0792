use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::hit_test::{find_node_at, SimpleNodeGeometry};
use crate::transform::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Table,
    Function,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Table => "table",
            NodeKind::Function => "function",
        }
    }
}

/// Which point of a node a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    /// Outgoing side.
    RightCenter,
    /// Incoming side.
    LeftCenter,
}

/// A rendered diagram node, positioned in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i32,
    pub kind: NodeKind,
    pub label: String,
    pub detail_lines: Vec<String>,
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

impl Node {
    pub fn new(
        id: i32,
        kind: NodeKind,
        label: impl Into<String>,
        detail_lines: Vec<String>,
        position: Point,
        (width, height): (f32, f32),
    ) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            detail_lines,
            position,
            width,
            height,
        }
    }

    pub fn anchor(&self, side: AnchorSide) -> Point {
        let y = self.position.y + self.height / 2.0;
        match side {
            AnchorSide::RightCenter => Point::new(self.position.x + self.width, y),
            AnchorSide::LeftCenter => Point::new(self.position.x, y),
        }
    }

    pub fn geometry(&self) -> SimpleNodeGeometry {
        SimpleNodeGeometry {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Live world-space geometry of every node in the diagram.
///
/// The registry is the only writer of node geometry. Every write records the
/// node as moved; [`take_moved`](Self::take_moved) hands the set to whoever
/// re-derives connectors.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: IndexMap<i32, Node>,
    by_name: HashMap<(NodeKind, String), i32>,
    moved: IndexSet<i32>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Insertion order is paint order.
    pub fn insert(&mut self, node: Node) {
        self.by_name.insert((node.kind, node.label.clone()), node.id);
        self.nodes.insert(node.id, node);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_name.clear();
        self.moved.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node id by kind and label.
    pub fn find(&self, kind: NodeKind, label: &str) -> Option<i32> {
        self.by_name.get(&(kind, label.to_string())).copied()
    }

    /// Nodes in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Overwrite a node's position. Returns `false` for unknown ids.
    pub fn move_node(&mut self, id: i32, position: Point) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.position = position;
        self.moved.insert(id);
        true
    }

    /// Overwrite a node's size, e.g. after the renderer measured it.
    pub fn resize_node(&mut self, id: i32, width: f32, height: f32) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.width = width;
        node.height = height;
        self.moved.insert(id);
        true
    }

    pub fn anchor(&self, id: i32, side: AnchorSide) -> Option<Point> {
        Some(self.nodes.get(&id)?.anchor(side))
    }

    /// Drain the ids of nodes changed since the last call.
    pub fn take_moved(&mut self) -> Vec<i32> {
        self.moved.drain(..).collect()
    }

    pub fn has_moved(&self) -> bool {
        !self.moved.is_empty()
    }

    /// Topmost node whose hit-rectangle contains the world point.
    pub fn node_at(&self, world: Point) -> Option<i32> {
        find_node_at(world, self.nodes.values().map(Node::geometry))
    }
}
