use logic_canvas::{
    CanvasConfig, CanvasController, CanvasSession, FsProjectSource, NodeKind, ScriptGenerator, View,
};
use slint::{ModelRc, VecModel};
use std::error::Error;
use std::rc::Rc;

slint::include_modules!();

/// Usage: `minimal [project] [config.toml]`, run from `demos/minimal`.
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let project = args.next().unwrap_or_else(|| "pong".to_string());
    let config = CanvasConfig::load_or_default(args.next())?;

    let window = MainWindow::new()?;
    let source = FsProjectSource::new("projects");
    let session = CanvasSession::new(config, source, ScriptGenerator::new("."));
    let ctrl = CanvasController::new(session);
    let w = window.as_weak();

    // Models are resynced by the controller after every mutation
    let nodes = Rc::new(VecModel::<DiagramNode>::default());
    ctrl.bind_node_model(nodes.clone(), |row| DiagramNode {
        id: row.id,
        title: row.label.clone(),
        details: row.details.clone(),
        x: row.x,
        y: row.y,
        width: row.width,
        height: row.height,
        raised: row.raised,
        is_function: row.kind == NodeKind::Function,
    });
    window.set_nodes(ModelRc::from(nodes));

    let links = Rc::new(VecModel::<DiagramLink>::default());
    ctrl.bind_connector_model(links.clone(), |row| DiagramLink {
        commands: row.path_commands.clone(),
        color: row.color,
    });
    window.set_links(ModelRc::from(links));

    // Core callbacks - controller handles the logic
    window.on_canvas_pointer_down(ctrl.pointer_down_callback());
    window.on_canvas_pointer_move(ctrl.pointer_move_callback());
    window.on_canvas_pointer_up(ctrl.pointer_up_callback());

    window.on_canvas_resized({
        let ctrl = ctrl.clone();
        move |width, height| ctrl.set_viewport_size(width, height)
    });

    // Zoom - refresh the label after every change
    let zoom_label = Rc::new(ctrl.zoom_label_callback());

    window.on_canvas_wheel({
        let wheel = ctrl.wheel_callback();
        let zoom_label = zoom_label.clone();
        let w = w.clone();
        move |x, y, delta_y| {
            let consumed = wheel(x, y, delta_y);
            if let Some(w) = w.upgrade() {
                w.set_zoom_label(zoom_label());
            }
            consumed
        }
    });

    window.on_zoom_in({
        let ctrl = ctrl.clone();
        let zoom_label = zoom_label.clone();
        let w = w.clone();
        move || {
            ctrl.zoom_in();
            if let Some(w) = w.upgrade() {
                w.set_zoom_label(zoom_label());
            }
        }
    });

    window.on_zoom_out({
        let ctrl = ctrl.clone();
        let zoom_label = zoom_label.clone();
        let w = w.clone();
        move || {
            ctrl.zoom_out();
            if let Some(w) = w.upgrade() {
                w.set_zoom_label(zoom_label());
            }
        }
    });

    window.on_reset_zoom({
        let ctrl = ctrl.clone();
        let zoom_label = zoom_label.clone();
        move || {
            ctrl.reset_zoom();
            if let Some(w) = w.upgrade() {
                w.set_zoom_label(zoom_label());
            }
        }
    });

    ctrl.set_viewport_size(1000.0, 800.0);
    ctrl.select_project(&project);
    ctrl.show_view(View::Canvas);

    window.run()?;
    Ok(())
}
