//! Terminal front-end for the pipe3d transform pipeline
//!
//! Implements the core `Platform` and `Canvas` traits on top of crossterm and
//! an ASCII rasterizer, and wires them to the frame driver.
use std::io;

use pipe3d_core::{FrameDriver, SceneConfig};

pub mod logging;
pub mod options;
pub mod platform;
pub mod renderer;

pub use platform::TerminalPlatform;
pub use renderer::AsciiRenderer;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    config: SceneConfig,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Take over the terminal and run the frame loop until exit.
    ///
    /// Returns the number of frames rendered. The terminal is restored on
    /// every exit path.
    pub fn run(self) -> io::Result<u64> {
        let mut platform = TerminalPlatform::initialize(&self.config)?;
        FrameDriver::new(self.config).run(&mut platform)
    }
}
