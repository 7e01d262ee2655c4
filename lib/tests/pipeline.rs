use std::path::Path;
use std::sync::Arc;

use corkboard::rayon::prelude::*;
use corkboard::cache::BuildCache;
use corkboard::config::Settings;
use corkboard::corpus::{Corpus, Documents};
use corkboard::markdown::{DirIndex, FrontMatter, Kanban, Markdown, PageTitle};
use corkboard::metadata::Title;
use corkboard::BuildContext;

const BOARD: &str = "\
---
kanban-plugin: board
---

## Doing

- [ ] Write report #URGENT @{2024-01-01} [[ReportDraft]]
- [x] Old task #done
- [ ] See [[Ideas|the ideas]] and [[Nowhere]] #Later @{2024-13-45}

%% - [ ] commented out %%

## Archive (archivado)

- [ ] Stale item [[Stale]]

%% kanban:settings
```
{\"kanban-plugin\":\"board\"}
```
%%
";

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn docs_tree(root: &Path) {
    write(root, "boards/Plan.md", BOARD);
    write(root, "research/Developments/index.md", "# Developments\n\n<!-- AUTO:DIRINDEX Developments -->\n");
    write(root, "research/Developments/ReportDraft.md", "# Report draft\n\n#urgent work due @{2025-01-05}\n");
    write(root, "research/Developments/Ideas.md", "Loose ideas, #later maybe.\n");
    write(root, "research/Archived/Stale.md", "# Stale\n");
    write(root, "research/Archived/index.md", "<!-- AUTO:DIRINDEX archive -->\n");
    write(root, "tags.toml", "[URGENT]\nbg = \"#ff000022\"\nfg = \"#ff0000\"\n\n[later]\nfg = \"#00f\"\n");
    write(root, "img/logo.svg", "<svg/>");
}

fn context(root: &Path, cache: Arc<BuildCache>) -> BuildContext {
    let settings = Settings {
        today: Some("2025-01-01".into()),
        tag_colors: Some(root.join("tags.toml")),
        ..Settings::default()
    };

    let corpus = Corpus::scan(root, settings.url_style()).unwrap();
    BuildContext::with_cache(settings, Arc::new(corpus), cache).unwrap()
}

fn render(cx: &BuildContext, src_path: &str) -> (String, corkboard::Page) {
    let doc = cx.corpus.get(src_path).unwrap();
    let page = cx.page(doc);
    let text = std::fs::read_to_string(&doc.abs_path).unwrap();
    let html = Markdown::from(&text)
        .plugins((
            FrontMatter::new(page.meta.clone()),
            DirIndex::new(cx, &page),
            Kanban::new(cx, &page),
            PageTitle::new(page.meta.clone()),
        ))
        .run()
        .unwrap();

    (html, page)
}

#[test]
fn board_page() {
    let dir = tempfile::tempdir().unwrap();
    docs_tree(dir.path());
    let cx = context(dir.path(), Arc::default());
    assert_eq!(cx.corpus.len(), 6);
    assert_eq!(cx.corpus.assets().len(), 2);

    let (html, page) = render(&cx, "boards/Plan.md");
    assert!(page.meta.get(Title).is_none());

    // Resolved against the docs roots, relative to `boards/Plan/`.
    assert!(html.contains(r#"href="../../research/Developments/ReportDraft/""#));
    assert!(html.contains(r#"href="../../research/Developments/Ideas/""#));
    assert!(html.contains(r#"href="../../research/Archived/Stale/""#));

    // `#done` has no colour entry, so it is filtered out.
    assert!(html.contains(r#"data-title="Old task" data-tags="" data-dates="" data-statuses="" data-hasdates="0""#));
    assert!(html.contains(r#"data-title="Write report" data-tags="URGENT" data-dates="2024-01-01" data-statuses="past" data-hasdates="1""#));
    assert!(html.contains(r#"data-title="See and Nowhere" data-tags="LATER""#));
    assert!(html.contains(r#"<span class="kb-chip kb-date">2024-13-45</span>"#));
    assert!(html.contains("background-color: #ff000022; color: #ff0000; border-color: #ff0000;"));
    assert!(html.contains(r#"<section class="kb-col kb-archived">"#));
    assert!(html.contains(r#"<article class="kb-card kb-done""#));

    assert!(!html.contains("commented out"));
    assert!(!html.contains("kanban:settings"));
    assert!(!html.contains("<li>"));
}

#[test]
fn index_pages() {
    let dir = tempfile::tempdir().unwrap();
    docs_tree(dir.path());
    let cx = context(dir.path(), Arc::default());

    let (html, page) = render(&cx, "research/Developments/index.md");
    assert_eq!(page.meta.get_str("title").as_deref(), Some("Developments"));
    assert!(html.contains(r#"<a class="di-card" href="Ideas/" data-title="Ideas" data-tags="LATER""#));
    assert!(html.contains(r#"<a class="di-card" href="ReportDraft/" data-title="Report draft" data-tags="URGENT" data-dates="2025-01-05" data-statuses="soon""#));
    assert!(html.find("Ideas/").unwrap() < html.find("ReportDraft/").unwrap());
    assert!(!html.contains("di-card\" href=\"./\""));

    let (html, _) = render(&cx, "research/Archived/index.md");
    assert!(html.contains(r#"<a class="di-card" href="Stale/""#));
    assert!(!html.contains("ReportDraft"));
}

#[test]
fn pages_render_in_parallel_over_one_cache() {
    let dir = tempfile::tempdir().unwrap();
    docs_tree(dir.path());
    let cache = Arc::new(BuildCache::new());
    let cx = context(dir.path(), cache.clone());

    let pages: Vec<String> = cx.corpus.documents()
        .par_iter()
        .map(|doc| render(&cx, &doc.src_path).0)
        .collect();

    assert_eq!(pages.len(), 6);
    assert!(pages.iter().any(|html| html.contains("data-kb-wrap")));
    assert_eq!(pages.iter().filter(|html| html.contains("data-di-wrap")).count(), 2);

    // A second context over the same tree reuses the cached indexes.
    let again = context(dir.path(), cache);
    assert_eq!(again.corpus.build_id(), cx.corpus.build_id());
    assert!(Arc::ptr_eq(&again.name_index(), &cx.name_index()));
}
