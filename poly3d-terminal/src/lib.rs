/// Terminal front-end: the same animated scene, rasterized into colored characters
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use poly3d_core::{FrameLoop, FrameScheduler, RenderDevice, Scene, SceneConfig, Viewport};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use logging::init_logging;
pub use renderer::TerminalDevice;

/// Frame pacing stand-in for a display's repaint callback.
///
/// A request is remembered until the main loop takes it on its next tick.
#[derive(Debug, Default)]
pub struct PacedScheduler {
    pending: bool,
}

impl PacedScheduler {
    /// Returns whether a repaint was requested, clearing the request
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for PacedScheduler {
    fn request_repaint(&mut self) {
        self.pending = true;
    }
}

/// Viewport for the area below the status line of a `columns` x `rows` terminal
pub fn scene_viewport(columns: u16, rows: u16) -> Viewport {
    TerminalDevice::viewport_for(columns, rows.saturating_sub(1).max(1))
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    frame_loop: FrameLoop<TerminalDevice, PacedScheduler>,
    running: bool,
    started: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new() -> poly3d_core::Result<Self> {
        let (columns, rows) = terminal::size()
            .map_err(|err| poly3d_core::Error::ContextUnavailable(err.to_string()))?;
        let viewport = scene_viewport(columns, rows);
        // Scene::setup sizes the cell grid from the viewport
        let mut device = TerminalDevice::new(0, 0);
        let started = Instant::now();
        let scene = Scene::setup(&mut device, &SceneConfig::with_viewport(viewport), 0.0)?;
        info!("terminal scene {}x{} cells", device.width(), device.height());

        Ok(Self {
            frame_loop: FrameLoop::new(scene, device, PacedScheduler::default()),
            running: true,
            started,
            last_fps_sample: started,
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        self.frame_loop.start();

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            if self.frame_loop.scheduler_mut().take_request() {
                let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
                self.frame_loop.on_repaint(now_ms);
                self.present()?;
                self.frame_count += 1;
            }

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.running = false;
                }
            }
            Event::Resize(columns, rows) => {
                // The projection keeps its startup aspect; only the cell grid follows.
                self.frame_loop
                    .device_mut()
                    .set_viewport(scene_viewport(columns, rows));
                execute!(stdout(), terminal::Clear(terminal::ClearType::All))?;
                debug!("resized to {}x{}", columns, rows);
            }
            _ => {}
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();

        // Status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "poly3d | frame {} | FPS: {:.1} | Q=Quit",
                self.frame_loop.frames(),
                self.fps
            )),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            ResetColor,
            cursor::MoveTo(0, 1)
        )?;

        self.frame_loop.device().draw(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn_cells(device: &TerminalDevice) -> usize {
        (0..device.height())
            .flat_map(|y| (0..device.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| device.cell(x, y).is_some())
            .count()
    }

    #[test]
    fn test_scheduler_request_is_taken_once() {
        let mut scheduler = PacedScheduler::default();
        assert!(!scheduler.take_request());
        scheduler.request_repaint();
        assert!(scheduler.take_request());
        assert!(!scheduler.take_request());
    }

    #[test]
    fn test_paced_loop_renders_scene_into_cells() {
        let viewport = TerminalDevice::viewport_for(80, 24);
        let mut device = TerminalDevice::new(80, 24);
        let scene = Scene::setup(&mut device, &SceneConfig::with_viewport(viewport), 0.0).unwrap();
        let mut frame_loop = FrameLoop::new(scene, device, PacedScheduler::default());

        frame_loop.start();
        for frame in 1..=3 {
            assert!(frame_loop.scheduler_mut().take_request());
            frame_loop.on_repaint(frame as f64 * 33.0);
        }

        assert!(drawn_cells(frame_loop.device()) > 0);
        assert_eq!(frame_loop.scene().viewport(), Viewport::new(80, 48));
    }

    #[test]
    fn test_scene_viewport_reserves_status_line() {
        assert_eq!(scene_viewport(80, 25), Viewport::new(80, 48));
        assert_eq!(scene_viewport(10, 0), Viewport::new(10, 2));
    }

    #[test]
    fn test_resize_regrows_cell_grid() {
        let mut device = TerminalDevice::new(0, 0);
        let config = SceneConfig::with_viewport(scene_viewport(80, 25));
        let scene = Scene::setup(&mut device, &config, 0.0).unwrap();
        let mut frame_loop = FrameLoop::new(scene, device, PacedScheduler::default());
        assert_eq!(frame_loop.device().width(), 80);
        assert_eq!(frame_loop.device().height(), 24);

        frame_loop.device_mut().set_viewport(scene_viewport(120, 41));
        frame_loop.on_repaint(16.0);

        assert_eq!(frame_loop.device().width(), 120);
        assert_eq!(frame_loop.device().height(), 40);
        assert!(drawn_cells(frame_loop.device()) > 0);
    }
}
