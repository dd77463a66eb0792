//! Deterministic two-column layout.
//!
//! Tables fill the left column top to bottom, functions a second column
//! `spacing_x` to the right, both in the graph's insertion order. Node ids
//! are assigned in the same order starting at 1 (tables first), so laying out
//! the same graph twice yields identical nodes.

use log::debug;
use serde::Deserialize;

use crate::graph::SpecGraph;
use crate::registry::{Node, NodeKind, NodeRegistry};
use crate::transform::Point;

/// Text metrics used to estimate node sizes before the renderer measures them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeMetrics {
    pub min_width: f32,
    pub char_width: f32,
    pub line_height: f32,
    pub header_height: f32,
    pub padding: f32,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            min_width: 180.0,
            char_width: 8.0,
            line_height: 18.0,
            header_height: 32.0,
            padding: 12.0,
        }
    }
}

impl NodeMetrics {
    /// Estimated `(width, height)` for a node with the given text.
    pub fn estimate(&self, label: &str, detail_lines: &[String]) -> (f32, f32) {
        let longest = detail_lines
            .iter()
            .map(|line| line.chars().count())
            .chain(std::iter::once(label.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (longest as f32 * self.char_width + 2.0 * self.padding).max(self.min_width);
        let height =
            self.header_height + detail_lines.len() as f32 * self.line_height + self.padding;
        (width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub margin_x: f32,
    pub margin_y: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Function row pitch as a fraction of `spacing_y`.
    pub function_pitch: f32,
    pub metrics: NodeMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_x: 100.0,
            margin_y: 50.0,
            spacing_x: 400.0,
            spacing_y: 200.0,
            function_pitch: 0.8,
            metrics: NodeMetrics::default(),
        }
    }
}

/// Compute the initial nodes for `graph`.
pub fn column_layout(graph: &SpecGraph, config: &LayoutConfig) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(graph.tables.len() + graph.functions.len());
    let mut next_id = 1;

    for (row, (name, table)) in graph.tables.iter().enumerate() {
        let detail_lines = table.columns.lines();
        let size = config.metrics.estimate(name, &detail_lines);
        let position = Point::new(config.margin_x, config.margin_y + row as f32 * config.spacing_y);
        nodes.push(Node::new(
            next_id,
            NodeKind::Table,
            name.as_str(),
            detail_lines,
            position,
            size,
        ));
        next_id += 1;
    }

    let function_x = config.margin_x + config.spacing_x;
    let function_pitch = config.spacing_y * config.function_pitch;
    for (row, (name, function)) in graph.functions.iter().enumerate() {
        let detail_lines = function.detail_lines();
        let size = config.metrics.estimate(name, &detail_lines);
        let position = Point::new(function_x, config.margin_y + row as f32 * function_pitch);
        nodes.push(Node::new(
            next_id,
            NodeKind::Function,
            name.as_str(),
            detail_lines,
            position,
            size,
        ));
        next_id += 1;
    }

    debug!(
        tables = graph.tables.len(),
        functions = graph.functions.len();
        "Column layout computed"
    );
    nodes
}

/// Replace the registry contents with a fresh layout of `graph`.
pub fn populate(registry: &mut NodeRegistry, graph: &SpecGraph, config: &LayoutConfig) {
    registry.clear();
    for node in column_layout(graph, config) {
        registry.insert(node);
    }
    // A fresh layout is routed in full; nothing counts as moved.
    registry.take_moved();
}
