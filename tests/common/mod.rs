//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

/// Tracks calls into the session's collaborators.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Project names fetched from the project source
    pub fetched: Rc<RefCell<Vec<String>>>,
    /// Project names passed to the artifact generator
    pub generated: Rc<RefCell<Vec<String>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.fetched.borrow_mut().clear();
        self.generated.borrow_mut().clear();
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }

    pub fn generate_count(&self) -> usize {
        self.generated.borrow().len()
    }
}

/// Two tables feeding one function.
pub const A_F_B: &str = r#"
tables:
  A:
    columns: [id, value]
  B:
    columns: [id]
functions:
  F:
    inputs: [A]
    outputs: [B]
"#;

/// Pong-like project with typed columns and a shared input table.
pub const PONG: &str = r#"
project_name: pong
tables:
  paddles:
    columns:
      left_y: float
      right_y: float
  ball:
    columns:
      x: float
      y: float
      dx: float
      dy: float
  score:
    columns:
      left: int
      right: int
functions:
  move_paddles:
    inputs: [paddles]
    outputs: [paddles]
  move_ball:
    inputs: [ball, paddles]
    outputs: [ball]
  update_score:
    inputs: [ball, score]
    outputs: [score, ball]
"#;
