//! # Logic Canvas
//!
//! The interactive diagram engine behind a project specification viewer. A
//! project's spec document declares data *tables* and *functions* reading and
//! writing them; the engine lays those out as two columns of nodes, routes
//! input/output connectors between them, and handles pan, zoom and node
//! dragging with connectors that follow.
//!
//! ## Layers
//!
//! - [`DiagramEngine`] - Layout, node registry, connector router and the
//!   pointer/wheel state machine behind one owned value
//! - [`CanvasSession`] - Active project, views and generated artifact kept in
//!   step with the engine
//! - [`CanvasController`] - Slint-facing callbacks and `VecModel` syncing
//!
//! ## Coordinates
//!
//! Nodes and connector paths live in **world space**. Pointer events arrive in
//! **screen space** and are converted with the current [`Transform`]:
//! `world = (screen - pan) / scale`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use logic_canvas::{CanvasConfig, DiagramEngine, SpecGraph};
//!
//! let graph = SpecGraph::from_yaml(yaml)?;
//! let mut engine = DiagramEngine::new(CanvasConfig::default());
//! engine.rebuild(&graph);
//!
//! engine.pointer_down(160.0, 110.0);
//! engine.pointer_move(210.0, 130.0);
//! engine.pointer_up();
//!
//! for connector in engine.snapshot().connectors {
//!     println!("{}", connector.path.to_svg());
//! }
//! ```

pub mod artifact;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod project;
pub mod registry;
pub mod router;
pub mod session;
pub mod transform;
pub mod view;

pub use artifact::{ArtifactGenerator, ArtifactOutcome, ArtifactState, ScriptGenerator};
pub use config::{CanvasConfig, ZoomConfig};
pub use controller::{CanvasController, ConnectorRow, NodeRow};
pub use engine::{DiagramEngine, DiagramSnapshot};
pub use error::{CanvasError, ConfigError, GenerationError};
pub use graph::{Columns, FunctionSpec, SpecGraph, TableSpec};
pub use hit_test::{find_node_at, NodeGeometry, SimpleNodeGeometry};
pub use interaction::{InteractionController, InteractionState, PointerUpdate};
pub use layout::{column_layout, LayoutConfig, NodeMetrics};
pub use project::{
    ActiveProject, FsProjectSource, ProjectData, ProjectSource, ProjectStore, SwitchOutcome,
    SwitchRequest, SwitchTicket,
};
pub use registry::{AnchorSide, Node, NodeKind, NodeRegistry};
pub use router::{Connector, ConnectorKind, ConnectorPath, ConnectorRouter};
pub use session::{CanvasSession, Notice};
pub use transform::{Point, ScaleLimits, Transform, TransformModel};
pub use view::{View, ViewSwitcher, ViewTransition};
