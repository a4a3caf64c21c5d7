//! Command-line options
use anyhow::{bail, Context};
use std::path::PathBuf;

use pipe3d_core::{FillMode, ProjectionMode, SceneConfig};

use crate::logging::LoggingConfig;

pub const USAGE: &str = "\
Usage: pipe3d-terminal [OPTIONS]

Options:
  --fps <N>            Target frames per second (0 = unpaced, default 60)
  --wireframe          Draw the triangle outline instead of filling it
  --ortho              Orthographic instead of perspective projection
  --log <PATH>         Log file (default pipe3d.log)
  --log-filter <SPEC>  env_logger filter, e.g. debug or pipe3d_core=debug
  -h, --help           Print this help";

/// Parsed command line
#[derive(Debug, Clone)]
pub struct Options {
    pub scene: SceneConfig,
    pub logging: LoggingConfig,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            logging: LoggingConfig {
                env_filter: None,
                log_file: Some(PathBuf::from("pipe3d.log")),
            },
            help: false,
        }
    }
}

/// Parse arguments, excluding the program name
pub fn parse_args<I>(args: I) -> anyhow::Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fps" => {
                let value = args.next().context("--fps needs a value")?;
                options.scene.target_fps = value
                    .parse()
                    .with_context(|| format!("invalid --fps value: {value}"))?;
            }
            "--wireframe" => options.scene.fill_mode = FillMode::WireFrame,
            "--ortho" => options.scene.projection = ProjectionMode::Orthographic,
            "--log" => {
                let path = args.next().context("--log needs a path")?;
                options.logging.log_file = Some(PathBuf::from(path));
            }
            "--log-filter" => {
                let filter = args.next().context("--log-filter needs a value")?;
                options.logging.env_filter = Some(filter);
            }
            "-h" | "--help" => options.help = true,
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Options> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.scene, SceneConfig::default());
        assert_eq!(options.logging.log_file, Some(PathBuf::from("pipe3d.log")));
        assert!(!options.help);
    }

    #[test]
    fn test_overrides() {
        let options = parse(&[
            "--fps",
            "30",
            "--wireframe",
            "--ortho",
            "--log",
            "/tmp/p.log",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(options.scene.target_fps, 30);
        assert_eq!(options.scene.fill_mode, FillMode::WireFrame);
        assert_eq!(options.scene.projection, ProjectionMode::Orthographic);
        assert_eq!(options.logging.log_file, Some(PathBuf::from("/tmp/p.log")));
        assert_eq!(options.logging.env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--fps"]).is_err());
        assert!(parse(&["--fps", "fast"]).is_err());
        let err = parse(&["--bogus"]).unwrap_err();
        assert!(err.to_string().contains("unknown argument: --bogus"));
    }
}
