//! Kanban boards: columns of task cards written as markdown.
//!
//! ```text
//! ## Doing
//! - [ ] Write report #URGENT @{2024-01-01} [[ReportDraft]]
//! - [x] Old task #done
//! ## Archive
//! - [ ] Stale item
//! ```
//!
//! [`parse_board()`] turns such text into a [`Board`]; link targets are
//! resolved in a second pass with [`Board::resolve_links()`], and
//! [`render_board()`] emits the interactive markup.

mod parse;
mod render;
mod assets;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::corpus::Documents;
use crate::date::DateStatus;
use crate::links::LinkResolver;

pub use parse::{is_board, parse_board};
pub use render::render_board;

/// Title given to a card whose text is nothing but tokens.
pub const UNTITLED: &str = "(untitled)";

/// One `@{date}` token on a card, with its status if the date is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateItem {
    pub raw: String,
    pub status: Option<DateStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub done: bool,
    pub title: String,
    /// The first wikilink's target, unresolved.
    pub target: Option<String>,
    /// `target` resolved against the corpus, relative to the board's page.
    pub href: Option<String>,
    pub date_items: Vec<DateItem>,
    /// Tags as written, minus `#`, after filtering.
    pub tags: Vec<String>,
    /// Normalized tags after filtering.
    pub tags_norm: BTreeSet<String>,
    /// The valid dates among `date_items`, in order.
    pub dates_iso: Vec<String>,
    pub statuses: BTreeSet<DateStatus>,
}

impl Card {
    pub fn has_dates(&self) -> bool {
        !self.dates_iso.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub title: String,
    pub archived: bool,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
    /// Every normalized tag kept on any card.
    pub tags: BTreeSet<String>,
}

impl Board {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.columns.iter().flat_map(|c| c.cards.iter())
    }

    /// Fills in every card's `href`. Archived columns resolve against
    /// `archive_roots`, the rest against `doc_roots`.
    pub fn resolve_links<D, R>(
        &mut self,
        resolver: &LinkResolver<'_, D>,
        page_url: &str,
        doc_roots: &[R],
        archive_roots: &[R],
    )
        where D: Documents + ?Sized, R: AsRef<str>
    {
        for column in &mut self.columns {
            let roots = match column.archived {
                true => archive_roots,
                false => doc_roots,
            };

            for card in &mut column.cards {
                card.href = card.target.as_deref()
                    .and_then(|target| resolver.resolve(target, page_url, roots));
            }
        }
    }
}

/// Inputs to [`parse_board()`] besides the text itself.
#[derive(Debug, Clone, Copy)]
pub struct BoardOptions<'a> {
    pub today: NaiveDate,
    /// Normalized tags to keep. `None` keeps every tag.
    pub allowed_tags: Option<&'a FxHashSet<String>>,
    /// Lower-case substring marking a column title as archived.
    pub archive_keyword: &'a str,
    pub untitled: &'a str,
}

impl<'a> BoardOptions<'a> {
    pub fn new(today: NaiveDate) -> Self {
        BoardOptions {
            today,
            allowed_tags: None,
            archive_keyword: "archiv",
            untitled: UNTITLED,
        }
    }
}
