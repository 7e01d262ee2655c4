use std::borrow::Cow;

use crate::board::{is_board, parse_board, render_board};
use crate::context::{BuildContext, Page};
use crate::error::Result;
use crate::links::LinkResolver;
use crate::markdown::Plugin;

/// Replaces a kanban board page with its interactive rendering. Other pages
/// pass through untouched.
#[derive(Debug, Clone, Copy)]
pub struct Kanban<'c> {
    cx: &'c BuildContext,
    page: &'c Page,
}

impl<'c> Kanban<'c> {
    pub fn new(cx: &'c BuildContext, page: &'c Page) -> Self {
        Kanban { cx, page }
    }
}

impl Plugin for Kanban<'_> {
    fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
        if !is_board(input, &self.page.meta) {
            return Ok(Cow::Borrowed(input));
        }

        let mut board = parse_board(input, &self.page.meta, &self.cx.board_options());
        if board.is_empty() {
            tracing::debug!(page = %self.page.src_path, "board has no columns; leaving page as is");
            return Ok(Cow::Borrowed(input));
        }

        let names = self.cx.name_index();
        let resolver = LinkResolver::new(&*self.cx.corpus, &names);
        let settings = &self.cx.settings;
        board.resolve_links(&resolver, &self.page.url, &settings.doc_roots, &settings.archive_roots);

        tracing::debug!(
            page = %self.page.src_path,
            columns = board.columns.len(),
            cards = board.cards().count(),
            "rendering board"
        );

        Ok(Cow::Owned(render_board(&board, &self.cx.colors)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::corpus::{Corpus, Documents};
    use crate::markdown::{FrontMatter, Markdown};
    use crate::url::UrlStyle;

    fn context() -> BuildContext {
        let corpus = Corpus::from_paths([
            "boards/Plan.md",
            "research/Developments/ReportDraft.md",
            "research/Archived/Stale.md",
        ], UrlStyle::Directory);

        let settings = Settings { today: Some("2024-01-01".into()), ..Settings::default() };
        BuildContext::new(settings, Arc::new(corpus)).unwrap()
    }

    #[test]
    fn boards_are_replaced() {
        let cx = context();
        let page = cx.page(&cx.corpus.documents()[0]);
        let text = "---\nkanban-plugin: board\n---\n\n## Doing\n\n- [ ] Write [[ReportDraft]] #urgent\n\n## Archive\n\n- [x] [[Stale]]\n";
        let html = Markdown::from(text)
            .plugins((FrontMatter::new(page.meta.clone()), Kanban::new(&cx, &page)))
            .run()
            .unwrap();

        assert!(html.contains(r#"<a class="kb-card" href="../../research/Developments/ReportDraft/""#));
        assert!(html.contains(r#"<a class="kb-card kb-done" href="../../research/Archived/Stale/""#));
        assert!(html.contains(r#"data-tags="URGENT""#));
        assert!(html.contains(r#"<section class="kb-col kb-archived">"#));
        assert!(html.contains("<script>"));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn other_pages_pass_through() {
        let cx = context();
        let page = cx.page(&cx.corpus.documents()[1]);
        let html = Markdown::from("## Doing\n\n- [ ] not a board\n")
            .plugins((Kanban::new(&cx, &page),))
            .run()
            .unwrap();

        assert!(html.contains("<h2>Doing</h2>"));
        assert!(!html.contains("kb-wrap"));
    }

    #[test]
    fn boards_without_columns_keep_their_content() {
        let cx = context();
        let page = cx.page(&cx.corpus.documents()[1]);
        let text = "We configure kanban-plugin: board in Obsidian.\n\nImportant prose paragraph.\n";
        let html = Markdown::from(text)
            .plugins((Kanban::new(&cx, &page),))
            .run()
            .unwrap();

        assert!(html.contains("<p>Important prose paragraph.</p>"));
        assert!(!html.contains("kb-wrap"));
    }
}
