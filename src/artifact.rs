//! Generated artifact markup.
//!
//! Generation is an external collaborator. Across the host boundary its result
//! is a plain string: either a complete markup document, or an error message
//! starting with `"Error"`. [`ArtifactOutcome::from_markup`] tells the two apart
//! so the failure can be surfaced instead of rendered.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::error::GenerationError;
use crate::project::ActiveProject;

/// Produces markup for a project.
pub trait ArtifactGenerator {
    fn generate(&self, project: &ActiveProject) -> Result<String, GenerationError>;

    /// Host-boundary form: markup, or `"Error: …"` on failure.
    fn generate_markup(&self, project: &ActiveProject) -> String {
        match self.generate(project) {
            Ok(markup) => markup,
            Err(err) => {
                warn!(
                    project = project.name(), error = err.to_string();
                    "Artifact generation failed"
                );
                format!("Error: {err}")
            }
        }
    }
}

/// Runs a generator script that writes `generated/<name>_code.html`.
///
/// The output file is reused when it already exists; the script is only run
/// when it is missing.
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    workdir: PathBuf,
    interpreter: String,
    script: PathBuf,
    output_dir: PathBuf,
}

impl ScriptGenerator {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            interpreter: "python".to_string(),
            script: PathBuf::from("code_gen.py"),
            output_dir: PathBuf::from("generated"),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Where the markup for `project` is expected.
    pub fn output_path(&self, project: &ActiveProject) -> PathBuf {
        self.workdir
            .join(&self.output_dir)
            .join(format!("{}_code.html", project.name()))
    }

    fn run_script(&self) -> Result<(), GenerationError> {
        let script = self.workdir.join(&self.script);
        if !script.exists() {
            return Err(GenerationError::ScriptMissing(self.script.clone()));
        }

        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .current_dir(&self.workdir)
            .output()
            .map_err(GenerationError::Spawn)?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(GenerationError::ScriptFailed {
                status: output.status.to_string(),
                output: combined,
            });
        }

        info!(script = self.script.display().to_string(); "Projects generated");
        Ok(())
    }
}

impl ArtifactGenerator for ScriptGenerator {
    fn generate(&self, project: &ActiveProject) -> Result<String, GenerationError> {
        let path = self.output_path(project);
        if !path.exists() {
            info!(
                path = path.display().to_string();
                "Generated artifact missing, running generator"
            );
            self.run_script()?;
        }

        fs::read_to_string(&path).map_err(|source| GenerationError::Read { path, source })
    }
}

/// A generator result classified for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    Markup(String),
    /// Message to show the user; never rendered as content.
    Failed(String),
}

impl ArtifactOutcome {
    pub fn from_markup(markup: String) -> Self {
        if markup.starts_with("Error") {
            ArtifactOutcome::Failed(markup)
        } else {
            ArtifactOutcome::Markup(markup)
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ArtifactOutcome::Failed(_))
    }
}

/// Markup currently loaded into the artifact view, tagged with its project.
#[derive(Debug, Clone, Default)]
pub struct ArtifactState {
    loaded: Option<(ActiveProject, String)>,
}

impl ArtifactState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded_for(&self, project: &ActiveProject) -> bool {
        matches!(&self.loaded, Some((loaded, _)) if loaded == project)
    }

    pub fn markup(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(_, markup)| markup.as_str())
    }

    pub fn load(&mut self, project: ActiveProject, markup: String) {
        self.loaded = Some((project, markup));
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }
}
