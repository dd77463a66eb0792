//! Project documents and the active-project switch protocol.
//!
//! A project is identified by name and consists of a markdown document and a
//! spec document. Documents are fetched through a [`ProjectSource`] and cached
//! per name for the session.
//!
//! Fetches may complete out of order. Every switch request gets a
//! [`SwitchTicket`]; only the most recent ticket may activate its project, so
//! a slow fetch for an earlier request can never overwrite the current view.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Name of the project currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveProject(String);

impl ActiveProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActiveProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw documents of one project. Missing documents are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectData {
    pub name: String,
    pub markdown: String,
    pub spec: String,
}

/// Where project documents come from.
pub trait ProjectSource {
    /// Fetch both documents. Missing documents yield empty strings, never an error.
    fn fetch(&self, project: &ActiveProject) -> ProjectData;
}

/// Reads `<root>/<name>.md` and `<root>/<name>.yaml`.
#[derive(Debug, Clone)]
pub struct FsProjectSource {
    root: PathBuf,
}

impl FsProjectSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_document(&self, project: &ActiveProject, extension: &str) -> String {
        let path = self.root.join(format!("{}.{extension}", project.name()));
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    warn!(path = path.display().to_string(); "Project document not found");
                } else {
                    warn!(
                        path = path.display().to_string(), error = err.to_string();
                        "Failed to read project document"
                    );
                }
                String::new()
            }
        }
    }
}

impl ProjectSource for FsProjectSource {
    fn fetch(&self, project: &ActiveProject) -> ProjectData {
        info!(project = project.name(); "Loading project data");
        ProjectData {
            name: project.name().to_string(),
            markdown: self.read_document(project, "md"),
            spec: self.read_document(project, "yaml"),
        }
    }
}

/// Proof that a project switch was requested; carries its position in the
/// request sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTicket {
    generation: u64,
    project: ActiveProject,
}

impl SwitchTicket {
    pub fn project(&self) -> &ActiveProject {
        &self.project
    }
}

/// Result of asking for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchRequest {
    /// Documents were cached; the project is active now.
    Ready(ActiveProject),
    /// Documents must be fetched; pass them back with the ticket.
    Pending(SwitchTicket),
}

/// Result of completing a pending fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Activated(ActiveProject),
    /// A later request superseded this one; the data was cached only.
    Superseded(ActiveProject),
}

/// Session cache of project documents plus the active-project pointer.
#[derive(Debug, Default)]
pub struct ProjectStore {
    cache: HashMap<String, ProjectData>,
    active: Option<ActiveProject>,
    generation: u64,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveProject> {
        self.active.as_ref()
    }

    /// Documents of the active project, if loaded.
    pub fn active_data(&self) -> Option<&ProjectData> {
        self.get(self.active.as_ref()?)
    }

    pub fn get(&self, project: &ActiveProject) -> Option<&ProjectData> {
        self.cache.get(project.name())
    }

    pub fn is_cached(&self, project: &ActiveProject) -> bool {
        self.cache.contains_key(project.name())
    }

    /// Start switching to `name`. Supersedes every earlier request.
    pub fn request(&mut self, name: &str) -> SwitchRequest {
        self.generation += 1;
        let project = ActiveProject::new(name);

        if self.is_cached(&project) {
            debug!(project = name; "Project data cached, switching immediately");
            self.active = Some(project.clone());
            return SwitchRequest::Ready(project);
        }

        SwitchRequest::Pending(SwitchTicket {
            generation: self.generation,
            project,
        })
    }

    /// Deliver fetched documents for `ticket`.
    ///
    /// The data is always cached; the project only becomes active if no newer
    /// request was made in the meantime.
    pub fn complete(&mut self, ticket: SwitchTicket, data: ProjectData) -> SwitchOutcome {
        self.cache.insert(ticket.project.name().to_string(), data);

        if ticket.generation != self.generation {
            debug!(project = ticket.project.name(); "Discarding superseded project switch");
            return SwitchOutcome::Superseded(ticket.project);
        }

        self.active = Some(ticket.project.clone());
        SwitchOutcome::Activated(ticket.project)
    }
}
