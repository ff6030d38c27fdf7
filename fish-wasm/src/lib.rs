use std::cell::RefCell;
use std::rc::Rc;

use fish_core::{AnimationLoop, Flock, FlockConfig, InputAdapter, InputEvent};
use fish_shared::FishSettings;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, HtmlCanvasElement, MediaQueryListEvent, MouseEvent, TouchEvent,
    Window,
};

mod canvas;
mod scheduler;

use canvas::CanvasSurface;
use scheduler::{FrameCallback, RafScheduler};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Everything one frame or one event handler touches
struct Scene {
    flock: Flock,
    animation: AnimationLoop,
    input: InputAdapter,
    surface: CanvasSurface,
    scheduler: RafScheduler,
    canvas: HtmlCanvasElement,
    window: Window,
}

impl Scene {
    fn frame(&mut self, time: f64) {
        let Scene {
            flock,
            animation,
            surface,
            scheduler,
            ..
        } = self;
        animation.on_frame(time, flock, surface, scheduler);
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle(event, &mut self.flock) {
            self.animation.apply(command, &mut self.scheduler);
        }
    }

    /// Logical size of the element the canvas fills
    fn measure(&self) -> (f64, f64) {
        if let Some(parent) = self.canvas.parent_element() {
            let rect = parent.get_bounding_client_rect();
            return (rect.width(), rect.height());
        }
        let width = self.window.inner_width().ok().and_then(|w| w.as_f64());
        let height = self.window.inner_height().ok().and_then(|h| h.as_f64());
        (width.unwrap_or(0.0), height.unwrap_or(0.0))
    }

    fn resize(&mut self) -> Result<(), JsValue> {
        let (width, height) = self.measure();
        if width <= 0.0 || height <= 0.0 {
            return Ok(());
        }

        let ratio = self.window.device_pixel_ratio().max(1.0);
        self.canvas.set_width((width * ratio) as u32);
        self.canvas.set_height((height * ratio) as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", width))?;
        style.set_property("height", &format!("{}px", height))?;
        self.surface.set_pixel_ratio(ratio)?;

        self.dispatch(InputEvent::Resize { width, height });
        Ok(())
    }

    fn pointer(&mut self, client_x: f64, client_y: f64) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        self.dispatch(InputEvent::PointerMove {
            x: client_x - rect.left(),
            y: client_y - rect.top(),
        });
    }
}

/// A DOM listener kept alive until teardown
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        scene: &Rc<RefCell<Scene>>,
        handler: fn(&mut Scene, Event),
    ) -> Result<Self, JsValue> {
        let scene = Rc::clone(scene);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            // Events only arrive between frames; a busy scene means teardown
            if let Ok(mut scene) = scene.try_borrow_mut() {
                handler(&mut scene, event);
            }
        }) as Box<dyn FnMut(Event)>);

        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            closure,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

// The closure is freed with the listener, so it must not stay registered
impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

fn on_mouse_move(scene: &mut Scene, event: Event) {
    if let Ok(event) = event.dyn_into::<MouseEvent>() {
        scene.pointer(event.client_x() as f64, event.client_y() as f64);
    }
}

fn on_touch_move(scene: &mut Scene, event: Event) {
    if let Ok(event) = event.dyn_into::<TouchEvent>() {
        if let Some(touch) = event.touches().item(0) {
            scene.pointer(touch.client_x() as f64, touch.client_y() as f64);
        }
    }
}

fn on_resize(scene: &mut Scene, _event: Event) {
    if let Err(err) = scene.resize() {
        console_log!("Resize failed: {:?}", err);
    }
}

fn on_visibility_change(scene: &mut Scene, _event: Event) {
    let hidden = scene
        .window
        .document()
        .map(|document| document.hidden())
        .unwrap_or(false);
    scene.dispatch(InputEvent::Visibility { visible: !hidden });
}

fn on_motion_preference(scene: &mut Scene, event: Event) {
    if let Ok(event) = event.dyn_into::<MediaQueryListEvent>() {
        scene.dispatch(InputEvent::ReducedMotion {
            enabled: event.matches(),
        });
    }
}

/// Animated fish school rendered behind the dashboard
#[wasm_bindgen]
pub struct FishBackground {
    scene: Rc<RefCell<Scene>>,
    frame_callback: FrameCallback,
    listeners: Vec<Listener>,
}

impl FishBackground {
    /// Attach every DOM listener, size the canvas and start animating
    fn wire(
        window: &Window,
        document: EventTarget,
        scene: &Rc<RefCell<Scene>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = vec![
            Listener::attach(window.clone().into(), "resize", scene, on_resize)?,
            Listener::attach(window.clone().into(), "mousemove", scene, on_mouse_move)?,
            Listener::attach(window.clone().into(), "touchmove", scene, on_touch_move)?,
            Listener::attach(document, "visibilitychange", scene, on_visibility_change)?,
        ];

        // Read before the first resize so the initial school already
        // honours the preference
        if let Ok(Some(query)) = window.match_media(REDUCED_MOTION_QUERY) {
            scene.borrow_mut().dispatch(InputEvent::ReducedMotion {
                enabled: query.matches(),
            });
            listeners.push(Listener::attach(query.into(), "change", scene, on_motion_preference)?);
        }

        let mut scene = scene.borrow_mut();
        scene.resize()?;
        let Scene {
            animation,
            scheduler,
            ..
        } = &mut *scene;
        animation.start(scheduler);

        Ok(listeners)
    }
}

#[wasm_bindgen]
impl FishBackground {
    /// Bind to `<canvas id=canvas_id>` and start animating.
    ///
    /// `settings_json` is an optional, possibly partial, `FishSettings`
    /// object such as `{"fishCount": 5, "maxSpeed": 2}`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, settings_json: Option<String>) -> Result<FishBackground, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

        let settings = match settings_json {
            Some(json) => FishSettings::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("invalid settings: {}", e)))?,
            None => FishSettings::default(),
        };
        let config = FlockConfig::from_settings(&settings);
        let max_delta_ms = config.max_delta_ms;
        let flock = Flock::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        console_log!(
            "Initializing fish background with {} fish",
            settings.fish_count
        );

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let scene = Rc::new(RefCell::new(Scene {
            flock,
            animation: AnimationLoop::new(max_delta_ms),
            input: InputAdapter::new(),
            surface: CanvasSurface::new(context),
            scheduler: RafScheduler::new(window.clone(), Rc::clone(&frame_callback)),
            canvas,
            window: window.clone(),
        }));

        let frame_scene = Rc::clone(&scene);
        *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
            if let Ok(mut scene) = frame_scene.try_borrow_mut() {
                scene.frame(time);
            }
        }) as Box<dyn FnMut(f64)>));

        match Self::wire(&window, document.into(), &scene) {
            Ok(listeners) => Ok(FishBackground {
                scene,
                frame_callback,
                listeners,
            }),
            Err(err) => {
                // Listeners attached so far were dropped and detached;
                // this breaks the scene <-> callback cycle
                frame_callback.borrow_mut().take();
                Err(err)
            }
        }
    }

    /// Feed a pointer sample in canvas coordinates
    pub fn pointer_at(&mut self, x: f64, y: f64) {
        self.scene
            .borrow_mut()
            .dispatch(InputEvent::PointerMove { x, y });
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.scene
            .borrow_mut()
            .dispatch(InputEvent::ReducedMotion { enabled });
    }

    pub fn pause(&mut self) {
        self.scene
            .borrow_mut()
            .dispatch(InputEvent::Visibility { visible: false });
    }

    pub fn resume(&mut self) {
        self.scene
            .borrow_mut()
            .dispatch(InputEvent::Visibility { visible: true });
    }

    /// Re-measure the canvas container
    pub fn resize(&mut self) -> Result<(), JsValue> {
        self.scene.borrow_mut().resize()
    }

    pub fn fish_count(&self) -> usize {
        self.scene.borrow().flock.fishes.len()
    }

    pub fn is_running(&self) -> bool {
        self.scene.borrow().animation.is_running()
    }

    /// `FlockStatus` as JSON
    pub fn status(&self) -> Result<String, JsValue> {
        let scene = self.scene.borrow();
        let status = scene.animation.status(&scene.flock);
        serde_json::to_string(&status).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Stop animating and release every listener. Safe to call twice.
    pub fn destroy(&mut self) {
        // Dropping a listener detaches it
        self.listeners.clear();

        if let Ok(mut scene) = self.scene.try_borrow_mut() {
            let Scene {
                animation,
                scheduler,
                ..
            } = &mut *scene;
            if animation.is_running() || animation.state() == fish_core::LoopState::Paused {
                console_log!("Fish background stopped");
            }
            animation.stop(scheduler);
        }

        // Breaks the scene <-> callback cycle
        self.frame_callback.borrow_mut().take();
    }
}

impl Drop for FishBackground {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_feeds_config() {
        let settings = FishSettings::from_json(r#"{"fishCount": 2, "maxSpeed": 1.5}"#).unwrap();
        let config = FlockConfig::from_settings(&settings);
        assert_eq!(config.fish_count, 2);
        assert_eq!(config.max_speed, 1.5);
        assert!(config.validate().is_ok());
    }
}
