/// poly3d Web - WASM/WebGL2 front-end for the spinning solids
///
/// Acquires a WebGL2 context from a canvas, uploads the scene and chains
/// frames through `requestAnimationFrame` until the page goes away.

pub mod device;
pub mod logging;
pub mod scheduler;
pub mod shader;

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info};
use poly3d_core::{Error, FrameLoop, Scene, SceneConfig, Viewport};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

pub use device::WebGlDevice;
pub use scheduler::AnimationFrameScheduler;

type WebFrameLoop = FrameLoop<WebGlDevice, AnimationFrameScheduler>;

#[wasm_bindgen]
pub struct WebRenderer {
    frame_loop: Option<Rc<RefCell<WebFrameLoop>>>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebRenderer {
        WebRenderer { frame_loop: None }
    }

    /// Set up the scene on the canvas with id `canvas_id` and start animating.
    ///
    /// Failures are fatal: the user is alerted and nothing is rendered.
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        if self.frame_loop.is_some() {
            return Ok(());
        }
        match launch(canvas_id) {
            Ok(frame_loop) => {
                self.frame_loop = Some(frame_loop);
                Ok(())
            }
            Err(err) => {
                report_fatal(&err);
                Err(JsValue::from_str(&err.to_string()))
            }
        }
    }

    /// Frames rendered since `init`
    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> u32 {
        self.frame_loop
            .as_ref()
            .map_or(0, |frame_loop| frame_loop.borrow().frames().min(u32::MAX as u64) as u32)
    }
}

impl Default for WebRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn launch(canvas_id: &str) -> Result<Rc<RefCell<WebFrameLoop>>, Error> {
    let window = web_sys::window()
        .ok_or_else(|| Error::ContextUnavailable("no browser window".to_string()))?;
    let canvas = find_canvas(&window, canvas_id)?;
    let mut device = WebGlDevice::from_canvas(&canvas)?;

    let config = SceneConfig::with_viewport(Viewport::new(canvas.width(), canvas.height()));
    let scene = Scene::setup(&mut device, &config, now_ms(&window))?;

    let callback = Rc::new(RefCell::new(None));
    let scheduler = AnimationFrameScheduler::new(window, Rc::clone(&callback));
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new(scene, device, scheduler)));

    // The callback keeps the loop alive for as long as the page is open.
    let looped = Rc::clone(&frame_loop);
    *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        looped.borrow_mut().on_repaint(timestamp);
    }));

    frame_loop.borrow_mut().start();
    info!("animating on #{}", canvas_id);
    Ok(frame_loop)
}

fn find_canvas(window: &Window, canvas_id: &str) -> Result<HtmlCanvasElement, Error> {
    window
        .document()
        .and_then(|document| document.get_element_by_id(canvas_id))
        .ok_or_else(|| Error::ContextUnavailable(format!("no element with id '{}'", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::ContextUnavailable(format!("#{} is not a canvas", canvas_id)))
}

/// Same clock as the `requestAnimationFrame` timestamps
fn now_ms(window: &Window) -> f64 {
    window.performance().map_or(0.0, |performance| performance.now())
}

fn report_fatal(err: &Error) {
    error!("{}", err);
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&err.to_string());
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init_logging(log::LevelFilter::Info);
    Ok(())
}
