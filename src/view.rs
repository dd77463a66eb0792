//! Which of the three views is visible, and when the diagram must be built.
//!
//! The diagram is built lazily: switching projects only marks it stale, and the
//! next time the canvas becomes visible the caller is told to build it. If the
//! canvas is already visible when the project changes, the build is due at once.

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Document preview.
    #[default]
    Project,
    /// Interactive diagram.
    Canvas,
    /// Generated artifact markup.
    Artifact,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Project => "project",
            View::Canvas => "canvas",
            View::Artifact => "artifact",
        }
    }
}

/// What the caller has to do after a view change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTransition {
    pub view: View,
    /// The view changed from something else.
    pub changed: bool,
    /// The diagram must be (re)built before it is drawn.
    pub build_diagram: bool,
}

#[derive(Debug, Clone)]
pub struct ViewSwitcher {
    current: View,
    diagram_stale: bool,
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self {
            current: View::Project,
            diagram_stale: true,
        }
    }
}

impl ViewSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn is_diagram_stale(&self) -> bool {
        self.diagram_stale
    }

    pub fn show(&mut self, view: View) -> ViewTransition {
        let changed = self.current != view;
        self.current = view;

        let build_diagram = view == View::Canvas && self.diagram_stale;
        if build_diagram {
            self.diagram_stale = false;
        }

        trace!(view = view.as_str(), changed, build_diagram; "View shown");
        ViewTransition {
            view,
            changed,
            build_diagram,
        }
    }

    /// The diagram no longer matches the active project.
    ///
    /// Returns `true` when the canvas is visible and the diagram must be built
    /// now; otherwise the build is deferred to the next [`show`](Self::show).
    pub fn invalidate_diagram(&mut self) -> bool {
        if self.current == View::Canvas {
            self.diagram_stale = false;
            true
        } else {
            self.diagram_stale = true;
            false
        }
    }
}
