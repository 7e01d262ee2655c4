use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use corkboard::config::Settings;
use corkboard::error::Result;
use corkboard::format::{Format, Toml};

/// The contents of `corkboard.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Markdown sources, relative to the site root.
    pub docs_dir: PathBuf,
    /// Where the built site goes, relative to the site root.
    pub site_dir: PathBuf,
    pub site_name: String,
    pub boards: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            docs_dir: "docs".into(),
            site_dir: "site".into(),
            site_name: "Docs".into(),
            boards: Settings::default(),
        }
    }
}

impl Config {
    /// Reads the config of the site at `root`. A missing file means the
    /// defaults. Relative paths in the file are made relative to `root`.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(crate::CONFIG_FILE);
        let mut config = match path.is_file() {
            true => Toml::read::<Config>(&path)?,
            false => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Config::default()
            }
        };

        config.docs_dir = root.join(&config.docs_dir);
        config.site_dir = root.join(&config.site_dir);
        if let Some(colors) = &config.boards.tag_colors {
            config.boards.tag_colors = Some(root.join(colors));
        }

        Ok(config)
    }
}
