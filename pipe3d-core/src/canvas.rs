//! Host collaborator seam: window lifecycle, keyboard and drawing primitives
use crate::input::KeyboardState;

/// Packed `0xRRGGBBAA` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Self = Self(0xFF00_00FF);
    pub const GREEN: Self = Self(0x00FF_00FF);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

/// How a triangle is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    Solid,
    WireFrame,
}

/// Drawing primitives supplied by the host, in screen pixels.
pub trait Canvas {
    /// Fill (or outline) the triangle `p0, p1, p2`
    fn draw_triangle(
        &mut self,
        p0: (i32, i32),
        p1: (i32, i32),
        p2: (i32, i32),
        color: Color,
        fill: FillMode,
    );

    /// Draw `text` with its top-left corner at `(x, y)`
    fn print(&mut self, x: i32, y: i32, text: &str);
}

/// Window and event-pump lifecycle supplied by the host.
///
/// The frame driver calls, per frame: `process_message`, `begin_frame`,
/// `keyboard`, the `Canvas` primitives, then `end_frame`. `finalize` runs
/// once on every exit path.
pub trait Platform: Canvas {
    type Error;

    /// Pump pending host events; `Ok(true)` means the window should close.
    fn process_message(&mut self) -> Result<bool, Self::Error>;

    fn begin_frame(&mut self) -> Result<(), Self::Error>;

    /// Snapshot of the keyboard for the current frame
    fn keyboard(&mut self) -> KeyboardState;

    fn end_frame(&mut self) -> Result<(), Self::Error>;

    fn finalize(&mut self) -> Result<(), Self::Error>;
}
