/// Terminal-based interactive mesh viewer
use crossterm::{
    cursor, event, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use objview_core::{Camera, FrameComposer, GeometryStore, TransformState, ViewerConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod input;
pub mod logging;
pub mod renderer;

pub use input::InputFrame;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal mesh viewing
pub struct TerminalApp {
    geometry: GeometryStore,
    state: TransformState,
    camera: Camera,
    composer: FrameComposer,
    renderer: AsciiRenderer,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(geometry: GeometryStore, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let rows = height.saturating_sub(STATUS_ROWS);

        Ok(Self {
            geometry,
            state: TransformState::new(config.controls),
            camera: config.camera.camera(width as u32, rows as u32 * CELL_ASPECT),
            composer: FrameComposer::new(),
            renderer: AsciiRenderer::new(width as usize, rows as usize, config.render.mode),
            target_frame_time: frame_time(config.render.target_fps),
            running: true,
            last_frame: Instant::now(),
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
        info!(
            vertices = self.geometry.vertex_count(),
            triangles = self.geometry.triangle_count(),
            "Viewer started"
        );

        while self.running {
            let frame_start = Instant::now();

            self.handle_input()?;
            if !self.running {
                break;
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("Viewer closed");
        Ok(())
    }

    /// Drain every pending event and apply each requested command once
    fn handle_input(&mut self) -> io::Result<()> {
        let mut events = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            events.push(event::read()?);
        }
        let input = InputFrame::collect(events);

        if input.quit_requested() {
            self.running = false;
            return Ok(());
        }
        if let Some((width, height)) = input.resize() {
            self.resize(width, height);
        }
        for command in input.commands() {
            self.state.apply(command);
        }
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS);
        debug!(width, rows, "Terminal resized");
        self.camera.resize(width as u32, rows as u32 * CELL_ASPECT);
        self.renderer.resize(width as usize, rows as usize);
    }

    fn render(&mut self) -> io::Result<()> {
        let projection = self.camera.projection_matrix();
        let view = self.camera.view_matrix();

        self.renderer.clear();
        let issue = self.composer.render(
            &projection,
            &view,
            &self.state,
            &self.geometry,
            &mut self.renderer,
        );

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;
        self.renderer.present(&mut stdout)?;

        // Status line
        let status = match issue {
            Some(issue) => format!(" | {}", issue),
            None => String::new(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(if issue.is_some() { Color::Red } else { Color::Yellow }),
            Print(format!(
                "objview | FPS: {:.1} | pos ({:.2}, {:.2}) rot {:.0}\u{b0} scale {:.3} | Arrows=Move Q/E=Scale R/F=Rotate Esc=Quit{}",
                self.fps,
                self.state.translation.x,
                self.state.translation.y,
                self.state.rotation_degrees,
                self.state.scale.x,
                status,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Frame budget for a target rate; a rate of zero is treated as one
fn frame_time(target_fps: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(target_fps.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_from_target_fps() {
        assert_eq!(frame_time(30), Duration::from_millis(33));
        assert_eq!(frame_time(0), Duration::from_secs(1));
    }
}
