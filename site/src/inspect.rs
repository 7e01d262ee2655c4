use std::path::Path;
use std::sync::Arc;

use corkboard::board::{is_board, parse_board};
use corkboard::corpus::Corpus;
use corkboard::error::{Chainable, Result};
use corkboard::markdown::{FrontMatter, Plugin};
use corkboard::metadata::Metadata;
use corkboard::{error, BuildContext};

use crate::config::Config;

/// Prints the board at `path` as JSON. Uses `corkboard.toml` from the current
/// directory if there is one. Links are left unresolved.
pub fn run(path: &Path, today: Option<&str>) -> Result<()> {
    let mut settings = Config::discover(Path::new("."))?.boards;
    if let Some(today) = today {
        settings.today = Some(today.into());
    }

    let text = std::fs::read_to_string(path)
        .chain_with(|| error!("failed to read board", "path" => path.display()))?;

    let corpus = Corpus::from_paths(Vec::<String>::new(), settings.url_style());
    let cx = BuildContext::new(settings, Arc::new(corpus))?;

    let meta = Metadata::new();
    let body = FrontMatter::new(meta.clone()).preprocess(&text)?;
    if !is_board(&body, &meta) {
        tracing::warn!(path = %path.display(), "not a kanban board");
    }

    let board = parse_board(&body, &meta, &cx.board_options());
    let json = serde_json::to_string_pretty(&board)?;
    println!("{json}");
    Ok(())
}
