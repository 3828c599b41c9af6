//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Front-end asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create kiln.toml and the source skeleton
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,
    },

    /// Clean the output directory, then run every transform
    #[command(visible_alias = "b")]
    Build {
        /// Keep existing output and only rebuild stale files
        #[arg(long)]
        no_clean: bool,
    },

    /// Build, serve the output with live reload and watch sources
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Compress rasters, write derived formats and optimize SVGs
    Images,

    /// Delete the output directory
    Clean,

    /// Delete every .jpg/.png under the image output except the keep list
    CleanImages {
        /// Relative path (under the image output) to keep; overrides `build.images.keep`
        #[arg(short, long = "keep", value_name = "PATH")]
        keep: Vec<String>,
    },

    /// Delete image outputs whose source no longer exists
    PruneImages,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Serve {
            interface: None,
            port: None,
            watch: None,
        }
    }
}

impl Cli {
    /// The subcommand to run; bare `kiln` behaves like `kiln serve`.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Commands::Init { .. }))
    }

    pub const fn is_serve(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_serves() {
        let cli = Cli::try_parse_from(["kiln"]).unwrap();
        assert!(cli.is_serve());
        assert!(matches!(cli.command(), Commands::Serve { port: None, .. }));
    }

    #[test]
    fn test_clean_images_keep_list() {
        let cli =
            Cli::try_parse_from(["kiln", "clean-images", "--keep", "sora.jpg", "-k", "top/a.png"])
                .unwrap();
        match cli.command() {
            Commands::CleanImages { keep } => assert_eq!(keep, ["sora.jpg", "top/a.png"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_serve_watch_flag() {
        let cli = Cli::try_parse_from(["kiln", "serve", "--watch", "false", "-p", "8080"]).unwrap();
        match cli.command() {
            Commands::Serve { port, watch, .. } => {
                assert_eq!(port, Some(8080));
                assert_eq!(watch, Some(false));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_and_version_flags() {
        let cli = Cli::try_parse_from(["kiln", "build", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command(), Commands::Build { no_clean: false }));

        let err = Cli::try_parse_from(["kiln", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["kiln", "prune-images", "-C", "site/kiln.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site/kiln.toml"));
        assert!(matches!(cli.command(), Commands::PruneImages));
    }
}
