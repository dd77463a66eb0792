//! Slint-facing controller for the diagram canvas.
//!
//! The [`CanvasController`] owns a [`CanvasSession`] behind `Rc<RefCell<..>>`
//! and hands out callback closures for the UI. Node and connector geometry is
//! mirrored into `VecModel`s bound with [`bind_node_model`] and
//! [`bind_connector_model`]; the models are resynced after every mutation, in
//! **screen space** so the UI draws them directly.
//!
//! # Example
//!
//! ```ignore
//! use logic_canvas::{CanvasController, CanvasSession, FsProjectSource, ScriptGenerator};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let source = FsProjectSource::new("projects");
//!     let session = CanvasSession::new(config, source, ScriptGenerator::new("."));
//!     let ctrl = CanvasController::new(session);
//!
//!     let nodes = Rc::new(VecModel::<DiagramNode>::default());
//!     ctrl.bind_node_model(nodes.clone(), |row| DiagramNode {
//!         id: row.id,
//!         title: row.label.clone(),
//!         x: row.x,
//!         y: row.y,
//!         raised: row.raised,
//!         ..Default::default()
//!     });
//!     window.set_nodes(ModelRc::from(nodes));
//!
//!     window.on_canvas_pointer_down(ctrl.pointer_down_callback());
//!     window.on_canvas_pointer_move(ctrl.pointer_move_callback());
//!     window.on_canvas_pointer_up(ctrl.pointer_up_callback());
//!     window.on_canvas_wheel(ctrl.wheel_callback());
//!     window.on_zoom_label(ctrl.zoom_label_callback());
//!
//!     window.run().unwrap();
//! }
//! ```
//!
//! [`bind_node_model`]: CanvasController::bind_node_model
//! [`bind_connector_model`]: CanvasController::bind_connector_model

use std::cell::RefCell;
use std::rc::Rc;

use slint::{Model, SharedString, VecModel};

use crate::engine::{DiagramEngine, DiagramSnapshot};
use crate::project::{ProjectData, SwitchOutcome, SwitchRequest, SwitchTicket};
use crate::registry::{Node, NodeKind};
use crate::router::{Connector, ConnectorKind};
use crate::session::{CanvasSession, Notice};
use crate::transform::{Point, Transform};
use crate::view::{View, ViewTransition};

/// One node as the UI draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: i32,
    pub kind: NodeKind,
    pub label: SharedString,
    /// Detail lines joined with `'\n'`.
    pub details: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Currently dragged; draw above the rest.
    pub raised: bool,
}

impl NodeRow {
    fn new(node: &Node, transform: &Transform, raised: Option<i32>) -> Self {
        let origin = transform.world_to_screen(node.position);
        Self {
            id: node.id,
            kind: node.kind,
            label: node.label.as_str().into(),
            details: node.detail_lines.join("\n").into(),
            x: origin.x,
            y: origin.y,
            width: node.width * transform.scale,
            height: node.height * transform.scale,
            raised: raised == Some(node.id),
        }
    }
}

/// One connector as the UI draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorRow {
    pub index: i32,
    pub from: i32,
    pub to: i32,
    pub kind: ConnectorKind,
    pub path_commands: SharedString,
    pub color: slint::Color,
}

impl ConnectorRow {
    fn new(index: usize, connector: &Connector, transform: &Transform) -> Self {
        Self {
            index: index as i32,
            from: connector.from,
            to: connector.to,
            kind: connector.kind,
            path_commands: connector.path.to_screen(transform).to_svg().into(),
            color: connector.kind.color(),
        }
    }
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, snapshot: &DiagramSnapshot);
}

struct NodeModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for NodeModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&NodeRow) -> P,
{
    fn sync(&self, snapshot: &DiagramSnapshot) {
        let rows = snapshot
            .nodes
            .iter()
            .map(|node| NodeRow::new(node, &snapshot.transform, snapshot.raised));
        sync_rows(&self.model, rows.map(|row| (self.constructor)(&row)));
    }
}

struct ConnectorModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConnectorModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&ConnectorRow) -> P,
{
    fn sync(&self, snapshot: &DiagramSnapshot) {
        let rows = snapshot
            .connectors
            .iter()
            .enumerate()
            .map(|(index, connector)| ConnectorRow::new(index, connector, &snapshot.transform));
        sync_rows(&self.model, rows.map(|row| (self.constructor)(&row)));
    }
}

/// Overwrite existing rows, append new ones, drop the excess.
fn sync_rows<P: Clone + 'static>(model: &VecModel<P>, items: impl Iterator<Item = P>) {
    let mut count = 0;
    for (i, item) in items.enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        count = i + 1;
    }
    while model.row_count() > count {
        model.remove(model.row_count() - 1);
    }
}

/// Controller that owns the session and provides callback implementations.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct CanvasController {
    session: Rc<RefCell<CanvasSession>>,
    syncers: Rc<RefCell<Vec<Box<dyn ModelSyncer>>>>,
}

impl CanvasController {
    pub fn new(session: CanvasSession) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            syncers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Get access to the session.
    pub fn session(&self) -> Rc<RefCell<CanvasSession>> {
        self.session.clone()
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        self.session.borrow().engine().snapshot()
    }

    pub fn transform(&self) -> Transform {
        self.session.borrow().engine().transform()
    }

    /// Bind a node model; it is synced immediately and after every mutation.
    pub fn bind_node_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&NodeRow) -> P + 'static,
    {
        self.syncers
            .borrow_mut()
            .push(Box::new(NodeModelSyncer { model, constructor }));
        self.sync();
    }

    /// Bind a connector model; it is synced immediately and after every mutation.
    pub fn bind_connector_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&ConnectorRow) -> P + 'static,
    {
        self.syncers
            .borrow_mut()
            .push(Box::new(ConnectorModelSyncer { model, constructor }));
        self.sync();
    }

    /// Push the current snapshot into every bound model.
    pub fn sync(&self) {
        // Snapshot first so no session borrow is held while models notify.
        let snapshot = self.snapshot();
        for syncer in self.syncers.borrow().iter() {
            syncer.sync(&snapshot);
        }
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut DiagramEngine) -> R) -> R {
        let result = f(self.session.borrow_mut().engine_mut());
        self.sync();
        result
    }

    // === Callback factories ===

    /// Returns a callback for canvas pointer-down `(x, y)`.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.pointer_down(x, y);
        }
    }

    /// Returns a callback for canvas pointer-move `(x, y)`.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.pointer_move(x, y);
        }
    }

    /// Returns a callback for canvas pointer-up.
    pub fn pointer_up_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.pointer_up();
        }
    }

    /// Returns a callback for the wheel `(x, y, delta_y)`.
    ///
    /// Always returns `true`: the event is consumed so the host does not scroll.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) -> bool {
        let ctrl = self.clone();
        move |x, y, delta_y| {
            ctrl.wheel(x, y, delta_y);
            true
        }
    }

    /// Returns a callback computing a connector's screen-space path by index.
    ///
    /// The second argument is a version counter the UI bumps to force
    /// re-evaluation; it is ignored here.
    pub fn connector_path_callback(&self) -> impl Fn(i32, i32) -> SharedString {
        let session = self.session.clone();
        move |index, _version| {
            let session = session.borrow();
            let engine = session.engine();
            usize::try_from(index)
                .ok()
                .and_then(|index| engine.connectors().get(index))
                .map(|connector| connector.path.to_screen(&engine.transform()).to_svg())
                .unwrap_or_default()
                .into()
        }
    }

    /// Returns a callback for the zoom label, e.g. `"110%"`.
    pub fn zoom_label_callback(&self) -> impl Fn() -> SharedString {
        let session = self.session.clone();
        move || format!("{}%", session.borrow().engine().transform().zoom_percent()).into()
    }

    /// Returns a callback for renderer-measured node sizes `(id, width, height)`
    /// in screen pixels.
    pub fn node_size_callback(&self) -> impl Fn(i32, f32, f32) {
        let ctrl = self.clone();
        move |id, width, height| {
            ctrl.handle_node_size(id, width, height);
        }
    }

    // === Direct handlers ===

    pub fn pointer_down(&self, x: f32, y: f32) {
        self.with_engine(|engine| engine.pointer_down(x, y));
    }

    pub fn pointer_move(&self, x: f32, y: f32) {
        self.with_engine(|engine| engine.pointer_move(x, y));
    }

    pub fn pointer_up(&self) {
        self.with_engine(|engine| engine.pointer_up());
    }

    pub fn wheel(&self, x: f32, y: f32, delta_y: f32) -> bool {
        self.with_engine(|engine| engine.wheel(x, y, delta_y))
    }

    /// Convert a screen-space size to world space and record it.
    pub fn handle_node_size(&self, id: i32, width: f32, height: f32) -> bool {
        self.with_engine(|engine| {
            let scale = engine.transform().scale;
            let z = if scale > 0.0 { scale } else { 1.0 };
            engine.report_node_size(id, width / z, height / z)
        })
    }

    pub fn set_viewport_size(&self, width: f32, height: f32) {
        self.session.borrow_mut().engine_mut().set_viewport_size(width, height);
    }

    pub fn zoom_in(&self) -> bool {
        self.with_engine(|engine| engine.zoom_in())
    }

    pub fn zoom_out(&self) -> bool {
        self.with_engine(|engine| engine.zoom_out())
    }

    pub fn reset_zoom(&self) {
        self.with_engine(|engine| engine.reset_zoom());
    }

    /// Screen point to world point under the current transform.
    pub fn screen_to_world(&self, x: f32, y: f32) -> Point {
        self.transform().screen_to_world(Point::new(x, y))
    }

    // === Project and view handlers ===

    pub fn select_project(&self, name: &str) {
        self.session.borrow_mut().select_project(name);
        self.sync();
    }

    /// Start a switch. A cached project is activated immediately; otherwise
    /// the returned ticket must be handed back to [`finish_switch`] once the
    /// documents have been fetched.
    ///
    /// [`finish_switch`]: Self::finish_switch
    pub fn request_project(&self, name: &str) -> SwitchRequest {
        let request = self.session.borrow_mut().request_project(name);
        self.sync();
        request
    }

    /// Complete a pending switch. Superseded tickets leave the canvas as is.
    pub fn finish_switch(&self, ticket: SwitchTicket, data: ProjectData) -> SwitchOutcome {
        let outcome = self.session.borrow_mut().finish_switch(ticket, data);
        self.sync();
        outcome
    }

    pub fn show_view(&self, view: View) -> ViewTransition {
        let transition = self.session.borrow_mut().show_view(view);
        self.sync();
        transition
    }

    /// Load the artifact for the active project; a notice is for the user.
    pub fn run_current_project(&self) -> Option<Notice> {
        self.session.borrow_mut().run_current_project()
    }

    pub fn current_view(&self) -> View {
        self.session.borrow().current_view()
    }

    /// Raw markdown of the active project for the preview pane.
    pub fn markdown_preview(&self) -> SharedString {
        self.session
            .borrow()
            .active_data()
            .map(|data| data.markdown.as_str())
            .unwrap_or_default()
            .into()
    }

    /// Raw spec document of the active project for the preview pane.
    pub fn spec_preview(&self) -> SharedString {
        self.session
            .borrow()
            .active_data()
            .map(|data| data.spec.as_str())
            .unwrap_or_default()
            .into()
    }

    pub fn artifact_markup(&self) -> SharedString {
        self.session.borrow().artifact_markup().unwrap_or_default().into()
    }
}
