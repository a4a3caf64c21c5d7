//! pipe3d Terminal Demo - Spinning Triangle
//!
//! Projects a single triangle through the world/view/projection/viewport
//! pipeline and rasterizes it in the terminal.
//! Controls:
//!   - W/S or Up/Down: Move the triangle away from / toward the camera
//!   - A/D or Left/Right: Move the triangle left / right
//!   - Esc/Q: Quit

use anyhow::Context;
use pipe3d_terminal::logging::init_logging;
use pipe3d_terminal::options::{parse_args, USAGE};
use pipe3d_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    let options = parse_args(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    if let Some(path) = &options.logging.log_file {
        println!("Logging to {}", path.display());
    }
    init_logging(options.logging.clone()).context("failed to open log file")?;

    println!("Starting terminal renderer (press Esc or Q to quit)...");

    let frames = TerminalApp::new(options.scene)
        .run()
        .context("terminal renderer failed")?;

    log::info!("rendered {frames} frames");
    println!("Rendered {frames} frames.");
    Ok(())
}
