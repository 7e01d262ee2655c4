use rustc_hash::FxHashMap;

use crate::corpus::{Document, Documents};
use crate::text::name_key;
use crate::url::strip_md;

/// Source paths a link target may refer to, most specific first: the target
/// itself (as `t.md` or `t/index.md` unless it already names a `.md` file),
/// then each of those under every root in order. Duplicates are dropped.
///
/// ```
/// use corkboard::links::candidate_paths;
///
/// let roots = ["research/Developments", "/Developments/"];
/// assert_eq!(candidate_paths("Plan", &roots), [
///     "Plan.md",
///     "Plan/index.md",
///     "research/Developments/Plan.md",
///     "research/Developments/Plan/index.md",
///     "Developments/Plan.md",
///     "Developments/Plan/index.md",
/// ]);
///
/// assert_eq!(candidate_paths("/notes/a.md", &[] as &[&str]), ["notes/a.md"]);
/// assert!(candidate_paths("  ", &roots).is_empty());
/// ```
pub fn candidate_paths<R: AsRef<str>>(target: &str, roots: &[R]) -> Vec<String> {
    let target = target.trim().trim_start_matches('/');
    if target.is_empty() {
        return vec![];
    }

    let bases = match strip_md(target).len() != target.len() {
        true => vec![target.to_string()],
        false => vec![format!("{target}.md"), format!("{target}/index.md")],
    };

    let mut candidates: Vec<String> = bases.clone();
    for root in roots {
        let root = root.as_ref().trim().trim_matches('/');
        if root.is_empty() {
            continue;
        }

        for base in &bases {
            let candidate = format!("{root}/{base}");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Whether `src_path` is `root` or lies beneath it.
pub fn is_under(src_path: &str, root: &str) -> bool {
    let root = root.trim().trim_matches('/');
    !root.is_empty() && src_path.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Documents keyed by the [`name_key()`] of their file name.
#[derive(Debug, Default)]
pub struct NameIndex {
    map: FxHashMap<String, Vec<usize>>,
}

impl NameIndex {
    pub fn build<D: Documents + ?Sized>(docs: &D) -> Self {
        let mut map: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (i, doc) in docs.documents().iter().enumerate() {
            let key = name_key(&doc.src_path);
            if !key.is_empty() {
                map.entry(key).or_default().push(i);
            }
        }

        NameIndex { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The document whose name matches `target`. Among several, the first
    /// one under the earliest root in `roots` wins, else the first scanned.
    pub fn lookup<'d, D, R>(&self, docs: &'d D, target: &str, roots: &[R]) -> Option<&'d Document>
        where D: Documents + ?Sized, R: AsRef<str>
    {
        let hits = self.map.get(&name_key(target))?;
        let all = docs.documents();
        let preferred = roots.iter().find_map(|root| {
            hits.iter().find(|&&i| is_under(&all[i].src_path, root.as_ref()))
        });

        preferred.or(hits.first()).and_then(|&i| all.get(i))
    }
}

/// Resolves wikilink targets to URLs relative to the page being built.
#[derive(Debug)]
pub struct LinkResolver<'a, D: ?Sized> {
    docs: &'a D,
    names: &'a NameIndex,
}

impl<'a, D: Documents + ?Sized> LinkResolver<'a, D> {
    pub fn new(docs: &'a D, names: &'a NameIndex) -> Self {
        LinkResolver { docs, names }
    }

    /// The document `target` refers to: by exact source path first, then by
    /// name.
    pub fn find<R: AsRef<str>>(&self, target: &str, roots: &[R]) -> Option<&'a Document> {
        candidate_paths(target, roots).iter()
            .find_map(|path| self.docs.get(path))
            .or_else(|| self.names.lookup(self.docs, target, roots))
    }

    /// The URL `target` would have under the first root if it existed.
    pub fn guess<R: AsRef<str>>(&self, target: &str, roots: &[R]) -> String {
        let target = target.trim().trim_start_matches('/');
        let path = match roots.first().map(|r| r.as_ref().trim().trim_matches('/')) {
            Some(root) if !root.is_empty() => format!("{root}/{target}"),
            _ => target.to_string(),
        };

        self.docs.url_style().guess_url(&path)
    }

    /// The URL of `target` relative to `page_url`. `None` only for a blank
    /// target; an unknown target gets a guessed URL.
    pub fn resolve<R: AsRef<str>>(&self, target: &str, page_url: &str, roots: &[R]) -> Option<String> {
        if target.trim().is_empty() {
            return None;
        }

        let href = match self.find(target, roots) {
            Some(doc) => self.docs.relative_url(doc, page_url),
            None => {
                tracing::debug!(target, "no document for link; guessing");
                crate::url::relative_url(&self.guess(target, roots), page_url)
            }
        };

        Some(href)
    }
}
