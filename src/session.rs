//! Host glue: the active project, the visible view, the diagram and the
//! artifact, kept consistent with each other.
//!
//! Every project activation goes through one path that parses the spec
//! document, resets the diagram and the artifact, and then either rebuilds the
//! diagram (canvas visible) or leaves it for the next time the canvas is shown.

use log::{info, warn};

use crate::artifact::{ArtifactGenerator, ArtifactOutcome, ArtifactState};
use crate::config::CanvasConfig;
use crate::engine::DiagramEngine;
use crate::graph::SpecGraph;
use crate::project::{
    ActiveProject, ProjectData, ProjectSource, ProjectStore, SwitchOutcome, SwitchRequest,
    SwitchTicket,
};
use crate::view::{View, ViewSwitcher, ViewTransition};

/// A message the host must show the user, e.g. in a blocking dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(pub String);

impl Notice {
    pub fn message(&self) -> &str {
        &self.0
    }
}

pub struct CanvasSession {
    engine: DiagramEngine,
    views: ViewSwitcher,
    projects: ProjectStore,
    graph: SpecGraph,
    artifact: ArtifactState,
    source: Box<dyn ProjectSource>,
    generator: Box<dyn ArtifactGenerator>,
}

impl std::fmt::Debug for CanvasSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSession")
            .field("engine", &self.engine)
            .field("views", &self.views)
            .field("projects", &self.projects)
            .field("artifact", &self.artifact)
            .finish_non_exhaustive()
    }
}

impl CanvasSession {
    pub fn new(
        config: CanvasConfig,
        source: impl ProjectSource + 'static,
        generator: impl ArtifactGenerator + 'static,
    ) -> Self {
        Self {
            engine: DiagramEngine::new(config),
            views: ViewSwitcher::new(),
            projects: ProjectStore::new(),
            graph: SpecGraph::default(),
            artifact: ArtifactState::new(),
            source: Box::new(source),
            generator: Box::new(generator),
        }
    }

    // === Project switching ===

    /// Ask for `name`. Cached projects activate at once; otherwise the host
    /// fetches the data and passes it to [`finish_switch`](Self::finish_switch).
    pub fn request_project(&mut self, name: &str) -> SwitchRequest {
        let request = self.projects.request(name);
        if let SwitchRequest::Ready(project) = &request {
            self.activate(project.clone());
        }
        request
    }

    /// Deliver fetched data. Stale results are cached but not shown.
    pub fn finish_switch(&mut self, ticket: SwitchTicket, data: ProjectData) -> SwitchOutcome {
        let outcome = self.projects.complete(ticket, data);
        if let SwitchOutcome::Activated(project) = &outcome {
            self.activate(project.clone());
        }
        outcome
    }

    /// Switch to `name`, fetching synchronously from the session's source.
    pub fn select_project(&mut self, name: &str) -> ActiveProject {
        match self.request_project(name) {
            SwitchRequest::Ready(project) => project,
            SwitchRequest::Pending(ticket) => {
                let data = self.source.fetch(ticket.project());
                match self.finish_switch(ticket, data) {
                    SwitchOutcome::Activated(project) | SwitchOutcome::Superseded(project) => {
                        project
                    }
                }
            }
        }
    }

    fn activate(&mut self, project: ActiveProject) {
        info!(project = project.name(); "Activating project");

        let spec = self.projects.get(&project).map(|data| data.spec.as_str()).unwrap_or("");
        self.graph = match SpecGraph::from_yaml(spec) {
            Ok(graph) => graph,
            Err(err) => {
                warn!(
                    project = project.name(), error = err.to_string();
                    "Spec document did not parse, diagram left empty"
                );
                SpecGraph::default()
            }
        };

        self.engine.clear();
        self.artifact.clear();
        if self.views.invalidate_diagram() {
            self.engine.rebuild(&self.graph);
        }
    }

    // === Views ===

    pub fn show_view(&mut self, view: View) -> ViewTransition {
        let transition = self.views.show(view);
        if transition.build_diagram {
            self.engine.rebuild(&self.graph);
        }
        transition
    }

    /// Show the artifact view and load generated markup for the active project.
    ///
    /// Returns a notice when there is nothing to run or generation failed. The
    /// diagram and previews stay usable either way.
    pub fn run_current_project(&mut self) -> Option<Notice> {
        self.show_view(View::Artifact);

        let Some(project) = self.projects.active().cloned() else {
            return Some(Notice("No project selected".to_string()));
        };
        if self.artifact.is_loaded_for(&project) {
            return None;
        }

        info!(project = project.name(); "Generating artifact");
        match ArtifactOutcome::from_markup(self.generator.generate_markup(&project)) {
            ArtifactOutcome::Markup(markup) => {
                self.artifact.load(project, markup);
                None
            }
            ArtifactOutcome::Failed(message) => Some(Notice(message)),
        }
    }

    // === Accessors ===

    pub fn current_view(&self) -> View {
        self.views.current()
    }

    pub fn active_project(&self) -> Option<&ActiveProject> {
        self.projects.active()
    }

    /// Raw documents of the active project, for the preview panes.
    pub fn active_data(&self) -> Option<&ProjectData> {
        self.projects.active_data()
    }

    pub fn graph(&self) -> &SpecGraph {
        &self.graph
    }

    pub fn artifact_markup(&self) -> Option<&str> {
        self.artifact.markup()
    }

    pub fn engine(&self) -> &DiagramEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DiagramEngine {
        &mut self.engine
    }
}
