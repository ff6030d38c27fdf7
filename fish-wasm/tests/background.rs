use fish_shared::FlockStatus;
use fish_wasm::FishBackground;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Mount `<div><canvas id=id></canvas></div>` with a fixed CSS size
fn mount_canvas(id: &str, width: u32, height: u32) {
    let document = web_sys::window()
        .expect("no global window")
        .document()
        .expect("no document");

    let container = document.create_element("div").unwrap();
    container
        .set_attribute(
            "style",
            &format!("position: fixed; left: 0; top: 0; width: {width}px; height: {height}px"),
        )
        .unwrap();

    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);

    container.append_child(&canvas).unwrap();
    document.body().unwrap().append_child(&container).unwrap();
}

fn status(background: &FishBackground) -> FlockStatus {
    serde_json::from_str(&background.status().unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error() {
    assert!(FishBackground::new("no-such-canvas", None).is_err());
}

#[wasm_bindgen_test]
fn invalid_settings_are_rejected() {
    mount_canvas("fish-invalid", 200, 200);
    assert!(FishBackground::new("fish-invalid", Some("{\"fishCount\": -1}".into())).is_err());
    assert!(FishBackground::new("fish-invalid", Some("{\"maxSpeed\": 0}".into())).is_err());
    assert!(FishBackground::new("fish-invalid", Some("{\"fishCount\": 20000}".into())).is_err());
}

#[wasm_bindgen_test]
fn starts_running_with_a_seeded_school() {
    mount_canvas("fish-start", 400, 300);
    let background =
        FishBackground::new("fish-start", Some("{\"fishCount\": 4, \"seed\": 1}".into())).unwrap();

    assert!(background.is_running());
    let count = background.fish_count();
    // Reduced motion on the test machine halves the school
    assert!(count == 4 || count == 2);

    let status = status(&background);
    assert!(status.running);
    assert_eq!(status.fish_count, count);
    assert!(!status.target_active);
}

#[wasm_bindgen_test]
fn pointer_pause_resume_and_destroy() {
    mount_canvas("fish-lifecycle", 400, 300);
    let mut background = FishBackground::new("fish-lifecycle", None).unwrap();

    background.set_reduced_motion(false);
    background.pointer_at(120.0, 80.0);
    let status = status(&background);
    assert!(status.target_active);
    assert_eq!(status.target_id, 1);

    background.pause();
    assert!(!background.is_running());
    background.resume();
    assert!(background.is_running());

    background.destroy();
    assert!(!background.is_running());
    background.destroy();
}

fn move_pointer_on_window() {
    let window = web_sys::window().expect("no global window");
    let event = web_sys::MouseEvent::new("mousemove").unwrap();
    window.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn destroy_unhooks_window_listeners() {
    mount_canvas("fish-unhook", 400, 300);
    let mut background = FishBackground::new("fish-unhook", None).unwrap();
    background.set_reduced_motion(false);

    move_pointer_on_window();
    assert_eq!(status(&background).target_id, 1);

    background.destroy();
    move_pointer_on_window();
    assert_eq!(status(&background).target_id, 1);
}
