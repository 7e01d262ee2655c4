use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use corkboard::rayon::prelude::*;
use corkboard::corpus::{Document, Documents};
use corkboard::error::{Chainable, Result};
use corkboard::markdown::{DirIndex, FrontMatter, Kanban, Markdown, PageTitle};
use corkboard::board::is_board;
use corkboard::metadata::{MetaKey, Title};
use corkboard::{error, BuildContext};

use crate::discover::Site;

/// What a render produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub pages: usize,
    pub boards: usize,
    pub assets: usize,
}

trait PathExt {
    fn write_creating(&self, contents: impl AsRef<[u8]>) -> Result<()>;
}

impl PathExt for Path {
    fn write_creating(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        if let Some(parent) = self.parent() {
            std::fs::create_dir_all(parent)
                .chain_with(|| error!("failed to create output directory", "path" => parent.display()))?;
        }

        std::fs::write(self, contents)
            .chain_with(|| error!("failed to write output file", "path" => self.display()))
    }
}

fn shell(site_name: &str, title: &str, content: &str) -> String {
    use html_escape::encode_text as text;

    format!(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\">\n",
        "<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "<title>{title} - {site}</title>\n",
        "</head>\n",
        "<body>\n",
        "<main class=\"corkboard-page\">\n",
        "{content}",
        "</main>\n",
        "</body>\n",
        "</html>\n",
    ), title = text(title), site = text(site_name), content = content)
}

impl Site {
    /// Renders one page. Returns whether it was a board.
    fn render_page(&self, cx: &BuildContext, doc: &Document, output: &Path) -> Result<bool> {
        let text = std::fs::read(&doc.abs_path)
            .chain_with(|| error!("failed to read page", "path" => doc.abs_path.display()))?;

        let text = String::from_utf8_lossy(&text);
        let page = cx.page(doc);
        let html = Markdown::from(&text)
            .plugins((
                FrontMatter::new(page.meta.clone()),
                DirIndex::new(cx, &page),
                Kanban::new(cx, &page),
                PageTitle::new(page.meta.clone()),
            ))
            .run()
            .chain_with(|| error!("failed to render page", "path" => &*doc.src_path))?;

        let stem = doc.src_path.rsplit('/').next().unwrap_or(&doc.src_path);
        let title = page.meta.get_str(Title::KEY)
            .map(|t| t.to_string())
            .unwrap_or_else(|| corkboard::url::strip_md(stem).to_string());

        let dest = output.join(cx.corpus.url_style().dest_path(&doc.src_path));
        dest.write_creating(shell(&self.config.site_name, &title, &html))?;

        Ok(is_board(&text, &page.meta))
    }

    pub fn render(&self, output: &Path) -> Result<Report> {
        let cx = BuildContext::new(self.config.boards.clone(), self.corpus.clone())?;
        tracing::debug!(today = %cx.today, build = %cx.corpus.build_id(), "build context ready");

        let boards = AtomicUsize::new(0);
        self.corpus.documents()
            .par_iter()
            .map(|doc| -> Result<()> {
                if self.render_page(&cx, doc, output)? {
                    boards.fetch_add(1, Ordering::Relaxed);
                }

                Ok(())
            })
            .collect::<Result<()>>()?;

        self.corpus.assets()
            .par_iter()
            .map(|asset| -> Result<()> {
                let dest = output.join(&*asset.src_path);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)
                        .chain_with(|| error!("failed to create output directory", "path" => parent.display()))?;
                }

                std::fs::copy(&asset.abs_path, &dest)
                    .chain_with(|| error!("failed to copy asset", "path" => asset.abs_path.display()))?;

                Ok(())
            })
            .collect::<Result<()>>()?;

        Ok(Report {
            pages: self.corpus.len(),
            boards: boards.into_inner(),
            assets: self.corpus.assets().len(),
        })
    }
}
