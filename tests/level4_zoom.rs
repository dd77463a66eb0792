//! Level 4: Zoom Tests
//!
//! Tests wheel zoom at the cursor, zoom buttons at the viewport center,
//! clamping and the wheel policy during an active drag.

mod common;

use common::harness::CanvasTestHarness;
use common::{A_F_B, PONG};
use float_cmp::approx_eq;
use logic_canvas::Point;
use proptest::prelude::*;

fn assert_fixed(harness: &CanvasTestHarness, anchor: Point, world: Point) {
    let screen = harness.ctrl.transform().world_to_screen(world);
    assert!(approx_eq!(f32, screen.x, anchor.x, epsilon = 1e-2), "x drifted: {screen:?}");
    assert!(approx_eq!(f32, screen.y, anchor.y, epsilon = 1e-2), "y drifted: {screen:?}");
}

#[test]
fn test_wheel_zooms_at_cursor() {
    let harness = CanvasTestHarness::showing(A_F_B);
    let cursor = Point::new(420.0, 180.0);
    let world = harness.ctrl.screen_to_world(cursor.x, cursor.y);

    harness.ctrl.wheel(cursor.x, cursor.y, -120.0);
    assert!(approx_eq!(f32, harness.ctrl.transform().scale, 1.1, epsilon = 1e-5));
    assert_fixed(&harness, cursor, world);

    harness.ctrl.wheel(cursor.x, cursor.y, 120.0);
    harness.ctrl.wheel(cursor.x, cursor.y, 120.0);
    assert!(approx_eq!(f32, harness.ctrl.transform().scale, 0.9, epsilon = 1e-5));
    assert_fixed(&harness, cursor, world);
}

#[test]
fn test_zero_wheel_delta_is_noop() {
    let harness = CanvasTestHarness::showing(A_F_B);
    let before = harness.ctrl.transform();
    assert!(!harness.ctrl.wheel(300.0, 300.0, 0.0));
    assert_eq!(harness.ctrl.transform(), before);
}

#[test]
fn test_zoom_buttons_anchor_at_center() {
    let harness = CanvasTestHarness::showing(PONG);
    let center = Point::new(500.0, 400.0);
    let world = harness.ctrl.screen_to_world(center.x, center.y);

    harness.ctrl.zoom_in();
    harness.ctrl.zoom_in();
    assert_fixed(&harness, center, world);
    assert_eq!(harness.ctrl.zoom_label_callback()(), "120%");

    harness.ctrl.zoom_out();
    assert_fixed(&harness, center, world);
    assert_eq!(harness.ctrl.zoom_label_callback()(), "110%");
}

#[test]
fn test_scale_clamped_high() {
    let harness = CanvasTestHarness::showing(A_F_B);
    for _ in 0..100 {
        harness.ctrl.wheel(100.0, 100.0, -1.0);
    }
    assert_eq!(harness.ctrl.transform().scale, 5.0);
    assert!(!harness.ctrl.zoom_in());
}

#[test]
fn test_scale_clamped_low() {
    let harness = CanvasTestHarness::showing(A_F_B);
    for _ in 0..100 {
        harness.ctrl.zoom_out();
    }
    assert_eq!(harness.ctrl.transform().scale, 0.1);
    assert_eq!(harness.ctrl.zoom_label_callback()(), "10%");
}

#[test]
fn test_reset_zoom() {
    let harness = CanvasTestHarness::showing(A_F_B);
    harness.ctrl.zoom_in();
    let spot = harness.empty_spot();
    harness.drag(spot, Point::new(spot.x - 300.0, spot.y), 2);

    harness.ctrl.reset_zoom();

    let transform = harness.ctrl.transform();
    assert_eq!((transform.pan_x, transform.pan_y, transform.scale), (50.0, 50.0, 1.0));
    assert_eq!((harness.node(1).x, harness.node(1).y), (150.0, 100.0));
}

#[test]
fn test_zoom_rescales_rows_but_not_world() {
    let harness = CanvasTestHarness::showing(A_F_B);
    let world = harness.world_position(1);
    let width = harness.node(1).width;

    harness.ctrl.wheel(0.0, 0.0, -1.0);

    assert_eq!(harness.world_position(1), world);
    assert!(approx_eq!(f32, harness.node(1).width, width * 1.1, epsilon = 1e-3));
}

// ============================================================================
// Wheel during an active interaction
// ============================================================================

#[test]
fn test_wheel_ignored_while_dragging() {
    let harness = CanvasTestHarness::showing(A_F_B);
    let center = harness.node_center(1);
    harness.ctrl.pointer_down(center.x, center.y);

    // Consumed, but the view does not change
    assert!(harness.ctrl.wheel_callback()(center.x, center.y, -1.0));
    assert_eq!(harness.ctrl.transform().scale, 1.0);

    harness.ctrl.pointer_move(center.x + 30.0, center.y);
    assert_eq!(harness.world_position(1), Point::new(130.0, 50.0));
}

#[test]
fn test_wheel_ignored_while_panning() {
    let harness = CanvasTestHarness::showing(A_F_B);
    let spot = harness.empty_spot();
    harness.ctrl.pointer_down(spot.x, spot.y);
    assert!(!harness.ctrl.wheel(spot.x, spot.y, -1.0));
    harness.ctrl.pointer_up();

    assert!(harness.ctrl.wheel(spot.x, spot.y, -1.0));
}

proptest! {
    #[test]
    fn prop_wheel_sequence_keeps_cursor_point(
        cursor_x in 0.0f32..1000.0,
        cursor_y in 0.0f32..800.0,
        notches in proptest::collection::vec(prop_oneof![Just(-1.0f32), Just(1.0f32)], 1..40),
    ) {
        let harness = CanvasTestHarness::showing(A_F_B);
        let world = harness.ctrl.screen_to_world(cursor_x, cursor_y);

        for delta in notches {
            harness.ctrl.wheel(cursor_x, cursor_y, delta);
            let scale = harness.ctrl.transform().scale;
            prop_assert!((0.1..=5.0).contains(&scale));
        }

        let screen = harness.ctrl.transform().world_to_screen(world);
        prop_assert!(approx_eq!(f32, screen.x, cursor_x, epsilon = 0.05));
        prop_assert!(approx_eq!(f32, screen.y, cursor_y, epsilon = 0.05));
    }
}
