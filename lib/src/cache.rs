use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::corpus::{BuildId, Documents};
use crate::dir_index::IndexEntry;
use crate::links::NameIndex;

type Hasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

type Cell<T> = Arc<OnceLock<Arc<T>>>;

/// Indexes derived from a document set, computed at most once per
/// [`BuildId`] and shared read-only by every page of that build.
///
/// The map only hands out cells; a value is built inside its cell, so two
/// pages asking for the same index wait on one builder while other keys
/// proceed.
#[derive(Debug, Default)]
pub struct BuildCache {
    names: DashMap<BuildId, Cell<NameIndex>, Hasher>,
    dir_index: DashMap<(BuildId, Arc<str>), Cell<Vec<IndexEntry>>, Hasher>,
}

impl BuildCache {
    pub fn new() -> Self {
        BuildCache::default()
    }

    /// The name index of `docs`.
    pub fn name_index<D: Documents + ?Sized>(&self, docs: &D) -> Arc<NameIndex> {
        let id = docs.build_id();
        let cell = self.names.entry(id).or_default().clone();
        cell.get_or_init(|| {
            let index = NameIndex::build(docs);
            tracing::debug!(build = %id, names = index.len(), "built name index");
            Arc::new(index)
        }).clone()
    }

    /// The entries of directory-index `group` for build `id`, built with
    /// `build` the first time they're asked for.
    pub fn dir_index<F>(&self, id: BuildId, group: &str, build: F) -> Arc<Vec<IndexEntry>>
        where F: FnOnce() -> Vec<IndexEntry>
    {
        let cell = self.dir_index.entry((id, group.into())).or_default().clone();
        cell.get_or_init(|| {
            let entries = build();
            tracing::debug!(build = %id, group, entries = entries.len(), "built directory index");
            Arc::new(entries)
        }).clone()
    }

    /// Drops everything not computed for build `id`.
    pub fn retain(&self, id: BuildId) {
        self.names.retain(|k, _| *k == id);
        self.dir_index.retain(|(k, _), _| *k == id);
    }
}
