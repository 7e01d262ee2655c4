use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;

use crate::error::Result;
use crate::url::UrlStyle;

/// A markdown source document known to the build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Document {
    /// Path relative to the docs root, `/`-separated.
    pub src_path: Arc<str>,
    /// Where the source can be read from.
    pub abs_path: Arc<Path>,
    /// Site-root-relative URL of the rendered page.
    pub url: Arc<str>,
}

/// Any other file under the docs root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub src_path: Arc<str>,
    pub abs_path: Arc<Path>,
}

/// Identifies one snapshot of a document set. Equal snapshots have equal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildId(u64);

impl BuildId {
    pub fn of(style: UrlStyle, documents: &[Document]) -> Self {
        let mut hasher = FxHasher::default();
        style.hash(&mut hasher);
        for doc in documents {
            doc.src_path.hash(&mut hasher);
            doc.url.hash(&mut hasher);
        }

        BuildId(hasher.finish())
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The document corpus a page is built against.
pub trait Documents: Sync {
    /// Every document, in scan order.
    fn documents(&self) -> &[Document];

    /// The document with exactly this source path.
    fn get(&self, src_path: &str) -> Option<&Document>;

    fn url_style(&self) -> UrlStyle;

    fn build_id(&self) -> BuildId {
        BuildId::of(self.url_style(), self.documents())
    }

    /// The URL of `doc` relative to the page at `from_url`.
    fn relative_url(&self, doc: &Document, from_url: &str) -> String {
        crate::url::relative_url(&doc.url, from_url)
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    style: UrlStyle,
    documents: Vec<Document>,
    assets: Vec<Asset>,
    by_path: FxHashMap<Arc<str>, usize>,
    id: BuildId,
}

fn is_markdown(path: &str) -> bool {
    crate::url::strip_md(path).len() != path.len()
}

impl Corpus {
    fn new(style: UrlStyle) -> Self {
        Corpus {
            style,
            documents: vec![],
            assets: vec![],
            by_path: FxHashMap::default(),
            id: BuildId(0),
        }
    }

    fn insert(&mut self, src_path: &str, abs_path: PathBuf) {
        let src_path: Arc<str> = src_path.into();
        let abs_path: Arc<Path> = abs_path.into();
        if !is_markdown(&src_path) {
            self.assets.push(Asset { src_path, abs_path });
            return;
        }

        let url = self.style.page_url(&src_path).into();
        self.by_path.insert(src_path.clone(), self.documents.len());
        self.documents.push(Document { src_path, abs_path, url });
    }

    fn seal(mut self) -> Self {
        self.id = BuildId::of(self.style, &self.documents);
        self
    }

    /// Walks `root`, sorted by file name, skipping hidden entries. Markdown
    /// files become documents; everything else is an asset.
    pub fn scan<P: AsRef<Path>>(root: P, style: UrlStyle) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return err!("docs root is not a directory", "path" => root.display());
        }

        let walker = jwalk::WalkDir::new(root)
            .follow_links(true)
            .skip_hidden(true)
            .sort(true);

        let mut corpus = Corpus::new(style);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root)
                .map_err(|_| error!("walked outside of docs root", "path" => path.display()))?;

            let Some(src_path) = relative.to_str() else {
                tracing::warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            };

            corpus.insert(&src_path.replace('\\', "/"), path.clone());
        }

        let corpus = corpus.seal();
        tracing::debug!(
            documents = corpus.documents.len(),
            assets = corpus.assets.len(),
            build = %corpus.id,
            "scanned {}", root.display()
        );

        Ok(corpus)
    }

    /// Builds a corpus from source paths alone, each readable at the same
    /// path. Order is kept.
    pub fn from_paths<I, S>(paths: I, style: UrlStyle) -> Self
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let mut corpus = Corpus::new(style);
        for path in paths {
            let path = path.as_ref().replace('\\', "/");
            let path = path.trim_start_matches('/');
            corpus.insert(path, PathBuf::from(path));
        }

        corpus.seal()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Documents for Corpus {
    fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn get(&self, src_path: &str) -> Option<&Document> {
        self.by_path.get(src_path).map(|&i| &self.documents[i])
    }

    fn url_style(&self) -> UrlStyle {
        self.style
    }

    fn build_id(&self) -> BuildId {
        self.id
    }
}
