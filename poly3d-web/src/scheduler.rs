/// `requestAnimationFrame` as a frame scheduler
use std::cell::RefCell;
use std::rc::Rc;

use log::error;
use poly3d_core::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Repaint callback; receives the frame timestamp in milliseconds
pub type RepaintCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Re-arms the browser's repaint callback on every request.
///
/// The callback slot is filled after the frame loop exists, since the
/// callback itself owns the loop.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: RepaintCallback,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: RepaintCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_repaint(&mut self) {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            error!("repaint requested before the callback was installed");
            return;
        };
        if let Err(err) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            error!("requestAnimationFrame failed: {:?}", err);
        }
    }
}
