//! The parsed `{tables, functions}` graph of a project.
//!
//! A [`SpecGraph`] is read-only once built and is replaced wholesale when the
//! active project changes. Both mappings keep the document's insertion order,
//! which the layout engine relies on for deterministic placement.
//!
//! The spec document is YAML:
//!
//! ```yaml
//! tables:
//!   paddles:
//!     columns: [y, speed]
//!   ball:
//!     columns:
//!       x: float
//!       y: float
//! functions:
//!   move_ball:
//!     inputs: [ball, paddles]
//!     outputs: [ball]
//! ```
//!
//! Columns may be an ordered list of names or an ordered `name: type` mapping.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::CanvasError;
use crate::router::ConnectorKind;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpecGraph {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: IndexMap<String, TableSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub functions: IndexMap<String, FunctionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Columns,
}

/// Column declarations of a table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Columns {
    /// `columns: [x, y]`
    Names(Vec<String>),
    /// `columns: {x: float, y: float}`
    Typed(IndexMap<String, serde_yaml::Value>),
}

impl Default for Columns {
    fn default() -> Self {
        Columns::Names(Vec::new())
    }
}

impl Columns {
    /// One display line per column, in declaration order.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Columns::Names(names) => names.clone(),
            Columns::Typed(typed) => typed
                .iter()
                .map(|(name, ty)| match scalar_text(ty) {
                    Some(ty) => format!("{name}: {ty}"),
                    None => name.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Columns::Names(names) => names.len(),
            Columns::Typed(typed) => typed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctionSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: Vec<String>,
}

/// One declared input or output of a function, before geometry is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef<'a> {
    pub function: &'a str,
    pub table: &'a str,
    pub kind: ConnectorKind,
}

impl SpecGraph {
    /// Parse a spec document. Blank documents yield an empty graph.
    pub fn from_yaml(source: &str) -> Result<Self, CanvasError> {
        if source.trim().is_empty() {
            debug!("Spec document is blank, using empty graph");
            return Ok(Self::default());
        }

        let graph: SpecGraph = serde_yaml::from_str(source)?;
        debug!(
            tables = graph.tables.len(),
            functions = graph.functions.len();
            "Spec document parsed"
        );
        Ok(graph)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.functions.is_empty()
    }

    /// All declared edges in function order: each function's inputs first,
    /// then its outputs. Duplicate declarations are kept.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.functions.iter().flat_map(|(function, spec)| {
            let inputs = spec.inputs.iter().map(move |table| EdgeRef {
                function,
                table,
                kind: ConnectorKind::Input,
            });
            let outputs = spec.outputs.iter().map(move |table| EdgeRef {
                function,
                table,
                kind: ConnectorKind::Output,
            });
            inputs.chain(outputs)
        })
    }
}

impl FunctionSpec {
    /// `in: a, b` / `out: none` detail lines.
    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("in: {}", join_or_none(&self.inputs)),
            format!("out: {}", join_or_none(&self.outputs)),
        ]
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
