/// Repaint-driven render loop.
///
/// The host decides when frames happen; the loop only asks for the next one
/// through [`FrameScheduler`] and renders when called back. Nothing here
/// blocks, so tests drive it by calling [`FrameLoop::on_repaint`] directly.
use crate::device::RenderDevice;
use crate::scene::Scene;

/// Host primitive that arranges for one more repaint callback
pub trait FrameScheduler {
    fn request_repaint(&mut self);
}

pub struct FrameLoop<D: RenderDevice, S> {
    scene: Scene<D::Buffer>,
    device: D,
    scheduler: S,
    frames: u64,
}

impl<D, S> FrameLoop<D, S>
where
    D: RenderDevice,
    S: FrameScheduler,
{
    pub fn new(scene: Scene<D::Buffer>, device: D, scheduler: S) -> Self {
        Self {
            scene,
            device,
            scheduler,
            frames: 0,
        }
    }

    /// Ask the host for the first repaint
    pub fn start(&mut self) {
        self.scheduler.request_repaint();
    }

    /// Repaint callback: chain the next frame, then update and draw this one.
    pub fn on_repaint(&mut self, now_ms: f64) {
        self.scheduler.request_repaint();
        self.scene.render_frame(&mut self.device, now_ms);
        self.frames += 1;
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene<D::Buffer> {
        &self.scene
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
