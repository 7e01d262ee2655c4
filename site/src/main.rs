use std::path::{Path, PathBuf};
use std::time::Instant;

use corkboard::error::Result;
use tracing_subscriber::EnvFilter;

use crate::discover::Site;

mod config;
mod discover;
mod inspect;
mod render;

pub const CONFIG_FILE: &str = "corkboard.toml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Renders markdown docs with kanban boards and directory indexes.
        cmd corkboard {
            /// Log at debug level unless `RUST_LOG` says otherwise.
            optional -v, --verbose

            /// Build the site rooted at `root`, the current directory by default.
            cmd build {
                optional root: PathBuf
                /// Write the site here instead of the configured `site_dir`.
                optional -o, --output output: PathBuf
            }

            /// Parse one board and print it as JSON.
            cmd inspect {
                required path: PathBuf
                /// Classify due dates as of this `YYYY-MM-DD` date.
                optional --today today: String
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build(root: &Path, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();
    let site = Site::discover(root)?;
    tracing::info!(
        documents = site.corpus.len(),
        assets = site.corpus.assets().len(),
        "discovery time: {}ms", start.elapsed().as_millis()
    );

    let output = output.unwrap_or_else(|| site.output_dir());
    let render = Instant::now();
    let report = site.render(&output)?;
    tracing::info!(
        pages = report.pages,
        boards = report.boards,
        assets = report.assets,
        output = %output.display(),
        "render time: {}ms", render.elapsed().as_millis()
    );

    tracing::info!("total time: {}ms", start.elapsed().as_millis());
    Ok(())
}

pub fn main() {
    let flags = flags::Corkboard::from_env_or_exit();
    init_tracing(flags.verbose);

    let result = match flags.subcommand {
        flags::CorkboardCmd::Build(cmd) => {
            let root = cmd.root.unwrap_or_else(|| PathBuf::from("."));
            build(&root, cmd.output)
        }
        flags::CorkboardCmd::Inspect(cmd) => inspect::run(&cmd.path, cmd.today.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
