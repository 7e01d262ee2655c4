use std::sync::Arc;

use chrono::NaiveDate;
use derive_more::Debug;
use rustc_hash::FxHashSet;

use crate::board::BoardOptions;
use crate::cache::BuildCache;
use crate::config::Settings;
use crate::corpus::{Corpus, Document, Documents};
use crate::dir_index::{collect_entries, IndexEntry};
use crate::error::Result;
use crate::links::NameIndex;
use crate::metadata::Metadata;
use crate::tags::TagColors;

/// Everything a page needs from its build, computed once and shared by
/// reference across the pages being rendered.
#[derive(Debug)]
pub struct BuildContext {
    pub settings: Settings,
    pub colors: TagColors,
    pub corpus: Arc<Corpus>,
    pub today: NaiveDate,
    /// Normalized tags cards and listings may show. `None` shows all.
    pub allowed: Option<FxHashSet<String>>,
    #[debug(ignore)]
    cache: Arc<BuildCache>,
}

impl BuildContext {
    pub fn new(settings: Settings, corpus: Arc<Corpus>) -> Result<Self> {
        BuildContext::with_cache(settings, corpus, Arc::default())
    }

    /// Like [`BuildContext::new()`], reusing indexes already in `cache`.
    ///
    /// Tags are only restricted when a colour store is configured: the store
    /// is what defines the allowed set.
    pub fn with_cache(settings: Settings, corpus: Arc<Corpus>, cache: Arc<BuildCache>) -> Result<Self> {
        let today = settings.clock()?.today();
        let colors = match &settings.tag_colors {
            Some(path) => TagColors::load(path),
            None => TagColors::default(),
        };

        let restrict = settings.restrict_tags && settings.tag_colors.is_some();
        let allowed = restrict.then(|| colors.allow_list());
        Ok(BuildContext { settings, colors, corpus, today, allowed, cache })
    }

    pub fn cache(&self) -> &Arc<BuildCache> {
        &self.cache
    }

    pub fn name_index(&self) -> Arc<NameIndex> {
        self.cache.name_index(&*self.corpus)
    }

    /// The listing of directory-index `group`, whose documents live under
    /// `roots`. Hrefs are not part of the entries.
    pub fn dir_index_entries(&self, group: &str, roots: &[String]) -> Arc<Vec<IndexEntry>> {
        self.cache.dir_index(self.corpus.build_id(), group, || {
            collect_entries(&*self.corpus, roots, self.allowed.as_ref(), self.today)
        })
    }

    pub fn board_options(&self) -> BoardOptions<'_> {
        BoardOptions {
            today: self.today,
            allowed_tags: self.allowed.as_ref(),
            archive_keyword: &self.settings.archive_keyword,
            untitled: &self.settings.untitled,
        }
    }

    pub fn page(&self, doc: &Document) -> Page {
        Page::new(doc)
    }
}

/// The page being rendered.
#[derive(Debug, Clone)]
pub struct Page {
    pub src_path: Arc<str>,
    pub url: Arc<str>,
    pub meta: Metadata,
}

impl Page {
    pub fn new(doc: &Document) -> Self {
        Page { src_path: doc.src_path.clone(), url: doc.url.clone(), meta: Metadata::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::UrlStyle;

    fn settings() -> Settings {
        Settings { today: Some("2025-03-01".into()), ..Settings::default() }
    }

    #[test]
    fn context_from_settings() {
        let corpus = Arc::new(Corpus::from_paths(["research/Developments/A.md"], UrlStyle::Directory));
        let cx = BuildContext::new(settings(), corpus.clone()).unwrap();
        assert_eq!(cx.today, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(cx.allowed.is_none());
        assert_eq!(cx.board_options().archive_keyword, "archiv");

        let page = cx.page(&corpus.documents()[0]);
        assert_eq!(&*page.url, "research/Developments/A/");
        assert!(page.meta.is_empty());
        assert!(Arc::ptr_eq(&cx.name_index(), &cx.name_index()));

        let bad = Settings { utc_offset: "nowhere".into(), ..settings() };
        assert!(BuildContext::new(bad, corpus).is_err());
    }

    #[test]
    fn colour_store_restricts_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, r##"{"urgent": {"bg": "#f00"}, "__default__": {"fg": "#000"}}"##).unwrap();

        let corpus = Arc::new(Corpus::from_paths(["a.md"], UrlStyle::File));
        let settings = Settings { tag_colors: Some(path), ..settings() };
        let cx = BuildContext::new(settings, corpus).unwrap();
        let allowed = cx.allowed.as_ref().unwrap();
        assert!(allowed.contains("URGENT"));
        assert_eq!(allowed.len(), 1);
        assert_eq!(cx.colors.style("#Urgent").bg, "#f00");

        let debug = format!("{cx:?}");
        assert!(!debug.contains("cache"));
    }
}
