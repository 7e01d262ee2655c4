//! Searchable listings of the documents under a group of roots, spliced into
//! a page in place of a `<!-- AUTO:DIRINDEX Group -->` marker.

mod assets;

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::ops::Range;
use std::sync::Arc;

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use memchr::memmem;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::corpus::Documents;
use crate::date::{parse_date, DateStatus};
use crate::tags::TagColors;
use crate::text::{extract_dates, extract_tags, normalize_tag};

const MARKER: &str = "AUTO:DIRINDEX";

/// A found `<!-- AUTO:DIRINDEX Group -->` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
    pub span: Range<usize>,
    pub group: &'a str,
}

fn marker_at(s: &str, start: usize) -> Option<Marker<'_>> {
    let rest = s[start + 4..].trim_start();
    let rest = rest.strip_prefix(MARKER)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim_start();
    let run = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());

    // `name-->` closes the comment with the name's own trailing hyphens.
    let (len, tail) = match rest[run..].trim_start().strip_prefix("-->") {
        Some(tail) => (run, tail),
        None if rest[..run].ends_with("--") => (run - 2, rest[run..].strip_prefix('>')?),
        None => return None,
    };

    if len == 0 {
        return None;
    }

    Some(Marker { span: start..s.len() - tail.len(), group: &rest[..len] })
}

/// The first well-formed marker in `s`.
pub fn find_marker(s: &str) -> Option<Marker<'_>> {
    let finder = memmem::Finder::new("<!--");
    let mut cursor = 0;
    while let Some(i) = finder.find(&s.as_bytes()[cursor..]) {
        let start = cursor + i;
        if let Some(marker) = marker_at(s, start) {
            return Some(marker);
        }

        cursor = start + 1;
    }

    None
}

/// Whether `src_path` lies under any of `roots`, ignoring case. A root also
/// matches when it appears after extra leading directories.
pub fn in_group<R: AsRef<str>>(src_path: &str, roots: &[R]) -> bool {
    let path = src_path.replace('\\', "/").trim_matches('/').to_lowercase();
    let bounded = format!("/{path}/");
    roots.iter().any(|root| {
        let root = root.as_ref().replace('\\', "/");
        let root = root.trim_matches('/').to_lowercase();
        !root.is_empty() && bounded.contains(&format!("/{root}/"))
    })
}

/// One listed document. `url` is site-root relative; listings link to it
/// relative to the page they appear on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub title: String,
    pub src_path: Arc<str>,
    pub url: Arc<str>,
    pub tags: Vec<String>,
    pub tags_norm: BTreeSet<String>,
    /// The valid `@{date}`s in the document, in order.
    pub dates_iso: Vec<String>,
    pub statuses: BTreeSet<DateStatus>,
}

impl IndexEntry {
    pub fn has_dates(&self) -> bool {
        !self.dates_iso.is_empty()
    }
}

/// The text of the first `# Heading` line.
fn h1(text: &str) -> Option<&str> {
    text.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        let title = rest.trim();
        (rest.starts_with(char::is_whitespace) && !title.is_empty()).then_some(title)
    })
}

fn file_stem(src_path: &str) -> &str {
    let name = src_path.rsplit('/').next().unwrap_or(src_path);
    crate::url::strip_md(name)
}

/// Builds the entry for one document from its text.
pub fn entry_for(
    doc: &crate::corpus::Document,
    text: &str,
    allowed: Option<&FxHashSet<String>>,
    today: NaiveDate,
) -> IndexEntry {
    let title = h1(text).unwrap_or_else(|| file_stem(&doc.src_path)).to_string();
    let (tags_raw, _) = extract_tags(text);
    let (dates, _) = extract_dates(text);

    let allowed = |norm: &String| allowed.map_or(true, |allow| allow.contains(norm));
    let tags_norm = tags_raw.iter().map(|t| normalize_tag(t)).filter(allowed).collect();
    let tags = tags_raw.into_iter().filter(|t| allowed(&normalize_tag(t))).collect();

    let mut dates_iso = vec![];
    let mut statuses = BTreeSet::new();
    for raw in dates {
        if let Some(date) = parse_date(&raw) {
            statuses.insert(DateStatus::of(date, today));
            dates_iso.push(raw);
        }
    }

    IndexEntry {
        title,
        src_path: doc.src_path.clone(),
        url: doc.url.clone(),
        tags,
        tags_norm,
        dates_iso,
        statuses,
    }
}

/// Lists every document under `roots`, except `index.md` pages, sorted by
/// title. Unreadable documents are listed under their file name.
pub fn collect_entries<D, R>(
    docs: &D,
    roots: &[R],
    allowed: Option<&FxHashSet<String>>,
    today: NaiveDate,
) -> Vec<IndexEntry>
    where D: Documents + ?Sized, R: AsRef<str>
{
    let mut entries: Vec<IndexEntry> = docs.documents().iter()
        .filter(|doc| {
            let lowered = doc.src_path.to_lowercase();
            lowered.ends_with(".md") && !lowered.ends_with("/index.md") && lowered != "index.md"
        })
        .filter(|doc| in_group(&doc.src_path, roots))
        .map(|doc| {
            let text = match std::fs::read(&doc.abs_path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(path = %doc.abs_path.display(), "unreadable document: {e}");
                    String::new()
                }
            };

            entry_for(doc, &text, allowed, today)
        })
        .collect();

    entries.sort_by_cached_key(|e| e.title.to_lowercase());
    entries
}

/// Renders a listing of `entries` for the page at `page_url`.
pub fn render_index(entries: &[IndexEntry], page_url: &str, colors: &TagColors) -> String {
    let present: BTreeSet<&String> = entries.iter().flat_map(|e| &e.tags_norm).collect();

    let mut buf = String::with_capacity(2048);
    buf.push_str(assets::STYLE);
    buf.push('\n');
    buf.push_str(r#"<div class="di-wrap" data-di-wrap="1">"#);
    buf.push('\n');
    buf.push_str(concat!(
        r#"<div class="di-controls">"#,
        r#"<div class="di-field"><label>Name</label>"#,
        r#"<input class="di-input" type="search" placeholder="Search..." data-di-filter="q" /></div>"#,
        r#"<div class="di-field"><label>Due</label><select class="di-select" data-di-filter="status">"#,
        r#"<option value="">Any status</option>"#,
        r#"<option value="past">Overdue</option>"#,
        r#"<option value="soon">Next 7 days</option>"#,
        r#"<option value="later">Later</option>"#,
        r#"<option value="nodate">No date</option>"#,
        r#"</select></div>"#,
        r#"<div class="di-field"><label>From</label><input class="di-input" type="date" data-di-filter="from" /></div>"#,
        r#"<div class="di-field"><label>To</label><input class="di-input" type="date" data-di-filter="to" /></div>"#,
        "</div>\n",
    ));

    if !present.is_empty() {
        buf.push_str(r#"<div class="di-tagbar">"#);
        for tag in present {
            let _ = write!(buf,
                r#"<button type="button" class="di-tag" data-di-tag="{}" style="{}">#{}</button>"#,
                attr(tag), attr(&colors.style(tag).css_vars()), text(tag));
        }

        buf.push_str("</div>\n");
    }

    buf.push_str(r#"<div class="di-list">"#);
    buf.push('\n');
    if entries.is_empty() {
        buf.push_str("<div class=\"di-empty\">\u{2014}</div>\n");
    }

    for entry in entries {
        let href = crate::url::relative_url(&entry.url, page_url);
        let tags = entry.tags_norm.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",");
        let statuses = entry.statuses.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",");
        let _ = writeln!(buf,
            r#"<a class="di-card" href="{}" data-title="{}" data-tags="{}" data-dates="{}" data-statuses="{}" data-hasdates="{}">"#,
            attr(&href), attr(&entry.title), attr(&tags), attr(&entry.dates_iso.join(",")),
            statuses, if entry.has_dates() { 1 } else { 0 });

        let _ = writeln!(buf, r#"<div class="di-title">{}</div>"#, text(&entry.title));
        if entry.has_dates() || !entry.tags.is_empty() {
            buf.push_str(r#"<div class="di-meta">"#);
            if let Some(first) = entry.dates_iso.first() {
                let _ = write!(buf, r#"<span class="di-chip">{}</span>"#, text(first));
            }

            for tag in &entry.tags {
                let _ = write!(buf, r#"<span class="di-chip" style="{}">#{}</span>"#,
                    attr(&colors.css(tag)), text(tag));
            }

            buf.push_str("</div>\n");
        }

        buf.push_str("</a>\n");
    }

    if !entries.is_empty() {
        buf.push_str(r#"<div class="di-empty" data-di-empty="1" style="display:none;">No results</div>"#);
        buf.push('\n');
    }

    buf.push_str("</div>\n");
    buf.push_str(assets::SCRIPT);
    buf.push_str("\n</div>");
    buf
}

/// Replaces `marker` in `s` with `html`, followed by a blank line so that
/// markdown after it is parsed as markdown again.
pub fn splice<'a>(s: &'a str, marker: &Marker<'_>, html: &str) -> Cow<'a, str> {
    let mut output = String::with_capacity(s.len() + html.len() + 2);
    output.push_str(&s[..marker.span.start]);
    output.push_str(html);
    output.push_str("\n\n");
    output.push_str(&s[marker.span.end..]);
    Cow::Owned(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Document};
    use crate::url::UrlStyle;

    #[test]
    fn markers() {
        let s = "intro\n<!-- note -->\n<!--AUTO:DIRINDEXx --> <!--  AUTO:DIRINDEX   Dev_1-x  -->";
        let marker = find_marker(s).unwrap();
        assert_eq!(marker.group, "Dev_1-x");
        assert_eq!(&s[marker.span.clone()], "<!--  AUTO:DIRINDEX   Dev_1-x  -->");
        assert_eq!(find_marker("<!--AUTO:DIRINDEX x-->").unwrap().group, "x");

        assert_eq!(find_marker("<!-- AUTO:DIRINDEX Dev").map(|m| m.group), None);
        assert_eq!(find_marker("<!-- AUTO:DIRINDEX Dev! -->").map(|m| m.group), None);
        assert_eq!(find_marker("<!-- AUTO:DIRINDEX -->"), None);
        assert_eq!(find_marker("<!-- AUTO:DIRINDEX\nArchived\n-->").unwrap().group, "Archived");
    }

    #[test]
    fn group_membership() {
        let roots = ["research/Developments", "Developments"];
        assert!(in_group("research/developments/a.md", &roots));
        assert!(in_group("docs/Developments/sub/a.md", &roots));
        assert!(in_group("Developments", &roots));
        assert!(!in_group("research/DevelopmentsOld/a.md", &roots));
        assert!(!in_group("a.md", &[""]));
    }

    fn doc(src_path: &str) -> Document {
        let url = UrlStyle::Directory.page_url(src_path);
        Document { src_path: src_path.into(), abs_path: std::path::Path::new(src_path).into(), url: url.into() }
    }

    #[test]
    fn entries_from_text() {
        let today = parse_date("2025-01-01").unwrap();
        let text = "---\ntitle: x\n---\n#NotAHeading\n# Big Plan \nbody #Wip and #other @{2025-01-02} @{2025-02-30} @{2024-05-01}\n";
        let allowed: FxHashSet<String> = ["WIP".to_string()].into_iter().collect();

        let entry = entry_for(&doc("Developments/plan.md"), text, Some(&allowed), today);
        assert_eq!(entry.title, "Big Plan");
        assert_eq!(entry.tags, ["Wip"]);
        assert_eq!(entry.tags_norm.len(), 1);
        assert_eq!(entry.dates_iso, ["2025-01-02", "2024-05-01"]);
        assert_eq!(entry.statuses, BTreeSet::from([DateStatus::Past, DateStatus::Soon]));

        let entry = entry_for(&doc("Developments/Quiet Note.md"), "no heading", None, today);
        assert_eq!(entry.title, "Quiet Note");
        assert!(!entry.has_dates());
    }

    #[test]
    fn collection_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("research/Developments/deep")).unwrap();
        std::fs::create_dir_all(root.join("Archived")).unwrap();
        std::fs::write(root.join("research/Developments/b.md"), "# beta #x").unwrap();
        std::fs::write(root.join("research/Developments/deep/a.md"), "# Alpha").unwrap();
        std::fs::write(root.join("research/Developments/index.md"), "# Index").unwrap();
        std::fs::write(root.join("Archived/c.md"), "# Gamma").unwrap();

        let corpus = Corpus::scan(root, UrlStyle::Directory).unwrap();
        let roots = ["research/Developments", "Developments"];
        let entries = collect_entries(&corpus, &roots, None, parse_date("2025-01-01").unwrap());
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "beta #x"]);

        let html = render_index(&entries, "research/Developments/", &TagColors::default());
        assert!(html.contains(r#"href="deep/a/""#));
        assert!(html.contains(r#"data-di-tag="X""#));
        assert!(html.contains(r#"data-di-empty="1""#));
        assert!(!html.contains("\n\n"));
    }

    #[test]
    fn unreadable_documents_are_listed_by_name() {
        // Nothing exists at the relative path this gives the document.
        let corpus = Corpus::from_paths(["Developments/Lost Note.md"], UrlStyle::Directory);
        assert!(!corpus.documents()[0].abs_path.exists());

        let entries = collect_entries(&corpus, &["Developments"], None, parse_date("2025-01-01").unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Lost Note");
        assert!(entries[0].tags.is_empty());
        assert!(!entries[0].has_dates());
    }

    #[test]
    fn empty_listing_and_splice() {
        let html = render_index(&[], "./", &TagColors::default());
        assert!(html.contains("<div class=\"di-empty\">\u{2014}</div>"));
        assert!(!html.contains(r#"data-di-empty="1" style"#));

        let page = "# Index\n\n<!-- AUTO:DIRINDEX Archived -->\nafter\n";
        let marker = find_marker(page).unwrap();
        let spliced = splice(page, &marker, "<div>list</div>");
        assert_eq!(spliced, "# Index\n\n<div>list</div>\n\n\nafter\n");
    }
}
