use std::path::{Path, PathBuf};
use std::sync::Arc;

use corkboard::corpus::Corpus;
use corkboard::error::{Chainable, Result};
use corkboard::error;

use crate::config::Config;

/// A site: its configuration and the documents found under its docs dir.
#[derive(Debug)]
pub struct Site {
    pub root: PathBuf,
    pub config: Config,
    pub corpus: Arc<Corpus>,
}

impl Site {
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let config = Config::discover(&root)?;
        let corpus = Corpus::scan(&config.docs_dir, config.boards.url_style())
            .chain_with(|| error! {
                "failed to discover site",
                "root" => root.display(),
                "docs dir" => config.docs_dir.display(),
            })?;

        Ok(Site { root, config, corpus: Arc::new(corpus) })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.site_dir.clone()
    }
}
