//! Test harness wiring a controller to in-memory collaborators.
//!
//! Mirrors what a host window does: bind node and connector models, select a
//! project, show the canvas, then feed pointer events in screen space.

#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;

use logic_canvas::{
    ActiveProject, ArtifactGenerator, CanvasConfig, CanvasController, CanvasSession, ConnectorRow,
    GenerationError, NodeRow, Point, ProjectData, ProjectSource, View,
};
use slint::{Model, VecModel};

use super::CallbackTracker;

/// Serves spec documents from memory and records every fetch.
pub struct MemorySource {
    specs: HashMap<String, String>,
    tracker: CallbackTracker,
}

impl ProjectSource for MemorySource {
    fn fetch(&self, project: &ActiveProject) -> ProjectData {
        self.tracker.fetched.borrow_mut().push(project.name().to_string());
        ProjectData {
            name: project.name().to_string(),
            markdown: format!("# {}", project.name()),
            spec: self.specs.get(project.name()).cloned().unwrap_or_default(),
        }
    }
}

/// Generates `<html>name</html>`, or fails for names listed in `failing`.
pub struct MemoryGenerator {
    failing: Vec<String>,
    tracker: CallbackTracker,
}

impl ArtifactGenerator for MemoryGenerator {
    fn generate(&self, project: &ActiveProject) -> Result<String, GenerationError> {
        self.tracker.generated.borrow_mut().push(project.name().to_string());
        if self.failing.iter().any(|name| name == project.name()) {
            return Err(GenerationError::ScriptFailed {
                status: "exit status: 1".into(),
                output: "Traceback".into(),
            });
        }
        Ok(format!("<html>{}</html>", project.name()))
    }
}

pub struct CanvasTestHarness {
    pub ctrl: CanvasController,
    pub nodes: Rc<VecModel<NodeRow>>,
    pub connectors: Rc<VecModel<ConnectorRow>>,
    pub tracker: CallbackTracker,
}

impl CanvasTestHarness {
    /// Harness with one project `"main"` holding `spec`, canvas not yet shown.
    pub fn new(spec: &str) -> Self {
        Self::with_projects(&[("main", spec)], &[])
    }

    /// Harness with `spec` selected and the canvas visible.
    pub fn showing(spec: &str) -> Self {
        let harness = Self::new(spec);
        harness.ctrl.select_project("main");
        harness.ctrl.show_view(View::Canvas);
        harness
    }

    pub fn with_projects(projects: &[(&str, &str)], failing: &[&str]) -> Self {
        Self::with_config(CanvasConfig::default(), projects, failing)
    }

    pub fn with_config(config: CanvasConfig, projects: &[(&str, &str)], failing: &[&str]) -> Self {
        let tracker = CallbackTracker::new();
        let source = MemorySource {
            specs: projects
                .iter()
                .map(|(name, spec)| (name.to_string(), spec.to_string()))
                .collect(),
            tracker: tracker.clone(),
        };
        let generator = MemoryGenerator {
            failing: failing.iter().map(|name| name.to_string()).collect(),
            tracker: tracker.clone(),
        };

        let ctrl = CanvasController::new(CanvasSession::new(config, source, generator));
        ctrl.set_viewport_size(1000.0, 800.0);

        let nodes = Rc::new(VecModel::<NodeRow>::default());
        ctrl.bind_node_model(nodes.clone(), |row| row.clone());
        let connectors = Rc::new(VecModel::<ConnectorRow>::default());
        ctrl.bind_connector_model(connectors.clone(), |row| row.clone());

        Self {
            ctrl,
            nodes,
            connectors,
            tracker,
        }
    }

    // === Model access ===

    pub fn node_count(&self) -> usize {
        self.nodes.row_count()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.row_count()
    }

    /// Screen-space row for node `id`.
    pub fn node(&self, id: i32) -> NodeRow {
        self.nodes
            .iter()
            .find(|row| row.id == id)
            .unwrap_or_else(|| panic!("node {id} not in model"))
    }

    pub fn node_by_label(&self, label: &str) -> NodeRow {
        self.nodes
            .iter()
            .find(|row| row.label == label)
            .unwrap_or_else(|| panic!("node {label} not in model"))
    }

    pub fn connector(&self, index: usize) -> ConnectorRow {
        self.connectors.row_data(index).unwrap()
    }

    pub fn connector_paths(&self) -> Vec<String> {
        self.connectors.iter().map(|row| row.path_commands.to_string()).collect()
    }

    /// Screen-space center of node `id`.
    pub fn node_center(&self, id: i32) -> Point {
        let row = self.node(id);
        Point::new(row.x + row.width / 2.0, row.y + row.height / 2.0)
    }

    /// World-space position of node `id`.
    pub fn world_position(&self, id: i32) -> Point {
        self.ctrl
            .snapshot()
            .nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.position)
            .unwrap()
    }

    // === Interaction ===

    /// Press at `from`, move through to `to` in `steps`, release.
    pub fn drag(&self, from: Point, to: Point, steps: usize) {
        self.ctrl.pointer_down(from.x, from.y);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.ctrl
                .pointer_move(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        }
        self.ctrl.pointer_up();
    }

    /// Drag node `id` by a screen-space offset, grabbing at its center.
    pub fn drag_node(&self, id: i32, dx: f32, dy: f32) {
        let center = self.node_center(id);
        self.drag(center, Point::new(center.x + dx, center.y + dy), 4);
    }

    /// A screen point over no node.
    pub fn empty_spot(&self) -> Point {
        Point::new(990.0, 790.0)
    }
}
