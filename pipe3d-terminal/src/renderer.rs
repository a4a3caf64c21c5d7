//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Glyph used for solid triangle interiors
pub const FILL_GLYPH: char = '#';
/// Glyph used for wireframe edges
pub const EDGE_GLYPH: char = '*';

/// Character-cell framebuffer that triangles and text are rasterized into
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Option<Color>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(None);
    }

    /// Character at a cell, `None` outside the buffer
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    fn set(&mut self, x: i32, y: i32, c: char, color: Option<Color>) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = c;
        self.color_buffer[idx] = color;
    }

    /// Fill every cell whose center lies inside the triangle, in either winding.
    /// Vertices are in cell units.
    pub fn fill_triangle(&mut self, coords: [(f32, f32); 3], color: Color) {
        let [v0, v1, v2] = coords;

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

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    let inside_ccw = w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0;
                    let inside_cw = w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0;
                    if inside_ccw || inside_cw {
                        self.set(x, y, FILL_GLYPH, Some(color));
                    }
                }
            }
        }
    }

    /// Outline the triangle with Bresenham lines. Vertices are in cell units.
    ///
    /// Edges are clipped to the buffer first, so far off-screen vertices
    /// cost no more than on-screen ones.
    pub fn stroke_triangle(&mut self, coords: [(f32, f32); 3], color: Color) {
        let bounds = (self.width as f64, self.height as f64);
        let coords = coords.map(|(x, y)| (x as f64, y as f64));
        for i in 0..3 {
            if let Some((from, to)) = clip_segment(coords[i], coords[(i + 1) % 3], bounds) {
                let from = self.to_cell(from);
                let to = self.to_cell(to);
                self.line(from, to, color);
            }
        }
    }

    // Clipped endpoints may land exactly on the far edge.
    fn to_cell(&self, (x, y): (f64, f64)) -> (i32, i32) {
        let max_x = self.width.saturating_sub(1) as i32;
        let max_y = self.height.saturating_sub(1) as i32;
        (
            (x.floor() as i32).clamp(0, max_x),
            (y.floor() as i32).clamp(0, max_y),
        )
    }

    fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Color) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x, y, EDGE_GLYPH, Some(color));
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write `text` left to right from a cell, clipped at the buffer edge
    pub fn put_text(&mut self, x: i32, y: i32, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.set(x + i as i32, y, c, None);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    match color {
                        Some(color) => writer.queue(SetForegroundColor(color))?,
                        None => writer.queue(ResetColor)?,
                    };
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Liang-Barsky clip of the segment `a..b` to `[0, w] x [0, h]`.
///
/// Runs in `f64`: with one endpoint near `i32::MAX` the `f32` parameter
/// rounds the visible part of the edge away.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (w, h): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [(-dx, a.0), (dx, w - a.0), (-dy, a.1), (dy, h - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
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

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };

    fn count(renderer: &AsciiRenderer, glyph: char) -> usize {
        renderer.char_buffer.iter().filter(|&&c| c == glyph).count()
    }

    #[test]
    fn test_fill_covers_interior_in_both_windings() {
        let tri = [(2.2, 2.1), (18.3, 2.1), (2.2, 18.4)];
        let mut ccw = AsciiRenderer::new(20, 20);
        ccw.fill_triangle(tri, RED);
        let mut cw = AsciiRenderer::new(20, 20);
        cw.fill_triangle([tri[0], tri[2], tri[1]], RED);

        assert_eq!(ccw.cell(4, 4), Some(FILL_GLYPH));
        assert_eq!(cw.cell(4, 4), Some(FILL_GLYPH));
        assert_eq!(ccw.cell(17, 17), Some(' '));
        assert!(count(&ccw, FILL_GLYPH) > 100);
        assert!(count(&cw, FILL_GLYPH) > 100);
    }

    #[test]
    fn test_fill_clips_offscreen_triangle() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.fill_triangle([(-50.0, -50.0), (60.3, -50.0), (-50.0, 60.3)], RED);
        assert_eq!(renderer.cell(0, 0), Some(FILL_GLYPH));
        // Cells with x + y <= 9 sit below the hypotenuse x + y = 10.3.
        assert_eq!(count(&renderer, FILL_GLYPH), 40);
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.fill_triangle([(1.0, 1.0), (5.0, 5.0), (9.0, 9.0)], RED);
        assert_eq!(count(&renderer, FILL_GLYPH), 0);
    }

    #[test]
    fn test_stroke_marks_edges_only() {
        let mut renderer = AsciiRenderer::new(20, 20);
        renderer.stroke_triangle([(2.0, 2.0), (16.0, 2.0), (2.0, 16.0)], RED);
        assert_eq!(renderer.cell(2, 2), Some(EDGE_GLYPH));
        assert_eq!(renderer.cell(9, 2), Some(EDGE_GLYPH));
        assert_eq!(renderer.cell(2, 9), Some(EDGE_GLYPH));
        assert_eq!(renderer.cell(9, 9), Some(EDGE_GLYPH));
        assert_eq!(renderer.cell(5, 5), Some(' '));
    }

    #[test]
    fn test_stroke_clips_far_offscreen_vertex() {
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.stroke_triangle([(1.0e9, 5.5), (-3.0, 5.5), (10.5, 0.5)], RED);
        // The horizontal edge crosses the whole buffer.
        for x in 0..20 {
            assert_eq!(renderer.cell(x, 5), Some(EDGE_GLYPH));
        }
        assert_eq!(renderer.cell(10, 0), Some(EDGE_GLYPH));
        assert_eq!(renderer.cell(10, 8), Some(' '));
    }

    #[test]
    fn test_stroke_skips_edges_outside_buffer() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.stroke_triangle([(-50.0, -50.0), (-20.0, -50.0), (-50.0, -20.0)], RED);
        assert_eq!(count(&renderer, EDGE_GLYPH), 0);
    }

    #[test]
    fn test_clip_segment() {
        let bounds = (10.0, 10.0);
        let near = |p: (f64, f64), q: (f64, f64)| {
            (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9
        };

        let (from, to) = clip_segment((-10.0, 5.0), (20.0, 5.0), bounds).unwrap();
        assert!(near(from, (0.0, 5.0)), "{from:?}");
        assert!(near(to, (10.0, 5.0)), "{to:?}");

        let (from, to) = clip_segment((2.0, 3.0), (4.0, 5.0), bounds).unwrap();
        assert!(near(from, (2.0, 3.0)) && near(to, (4.0, 5.0)));

        assert_eq!(clip_segment((-5.0, -1.0), (20.0, -1.0), bounds), None);
        assert_eq!(clip_segment((-5.0, 8.0), (8.0, 25.0), bounds), None);
    }

    #[test]
    fn test_text_is_clipped_at_edge() {
        let mut renderer = AsciiRenderer::new(6, 2);
        renderer.put_text(3, 1, "Cross");
        assert_eq!(renderer.cell(3, 1), Some('C'));
        assert_eq!(renderer.cell(5, 1), Some('o'));
        assert_eq!(renderer.cell(6, 1), None);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut renderer = AsciiRenderer::new(4, 4);
        renderer.put_text(0, 0, "ab");
        renderer.clear();
        assert_eq!(renderer.cell(0, 0), Some(' '));

        renderer.resize(8, 3);
        assert_eq!((renderer.width(), renderer.height()), (8, 3));
        assert_eq!(renderer.cell(7, 2), Some(' '));
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = AsciiRenderer::new(3, 2);
        renderer.put_text(0, 0, "hi");
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("hi"));
    }
}
