/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use objview_core::{Camera, RenderMode, RenderTarget, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

type ScreenPoint = (f32, f32, f32);

/// ASCII renderer that turns composed frames into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    mode: RenderMode,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, mode: RenderMode) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            mode,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.mode);
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Current buffer contents, one string per row
    pub fn lines(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.char_buffer
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }

    fn render_triangle(&mut self, triangle: &Triangle, transform: &Matrix4<f32>) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, position) in screen_coords.iter_mut().zip(&triangle.positions) {
            match Camera::project_to_screen(
                position,
                transform,
                self.width as u32,
                self.height as u32,
            ) {
                Some(point) => *slot = point,
                None => return, // Triangle is clipped
            }
        }

        match self.mode {
            RenderMode::Wireframe => {
                for i in 0..3 {
                    self.rasterize_line(screen_coords[i], screen_coords[(i + 1) % 3]);
                }
            }
            RenderMode::Shaded => {
                // Two-sided shading from the object-space face normal
                let normal = triangle.calculate_normal();
                let light_dir = Vector3::new(0.3, 0.5, 1.0).normalize();
                let brightness = normal.dot(&light_dir).abs();

                // Skip the blank first entry so faces never vanish
                let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
                let char_index = 1 + (brightness * steps).round() as usize;
                let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

                self.rasterize_triangle(&screen_coords, character);
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    fn rasterize_line(&mut self, from: ScreenPoint, to: ScreenPoint) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let character = edge_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            let depth = from.2 + (to.2 - from.2) * t;
            self.plot(x.floor() as i32, y.floor() as i32, depth, character);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character);
                    }
                }
            }
        }
    }

    /// Write the buffer to a terminal, starting at the cursor position
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (row, line) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            for &c in line {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' | '|' | '/' | '\\' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if row + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderTarget for AsciiRenderer {
    fn draw(&mut self, transform: &Matrix4<f32>, triangles: &[Triangle]) {
        for triangle in triangles {
            self.render_triangle(triangle, transform);
        }
    }
}

/// Pick a line character that follows the edge direction on screen.
/// Screen y grows downwards.
fn edge_char(dx: f32, dy: f32) -> char {
    let (adx, ady) = (dx.abs(), dy.abs());
    if ady * 2.0 < adx {
        '-'
    } else if adx * 2.0 < ady {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
