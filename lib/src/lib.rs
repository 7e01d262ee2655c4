#![doc = svgbobdoc::transform!(
//! Kanban boards and directory indexes for markdown documentation sites.
//!
//! # Overview
//!
//! Corkboard turns two kinds of markdown pages into interactive HTML while a
//! site is being built:
//!
//!   * **Boards**: pages in the Obsidian Kanban notation. Level-2 headings
//!     are columns; checklist items are cards carrying `#tags`,
//!     `@{YYYY-MM-DD}` due dates and `[[wikilinks]]` to other documents.
//!
//!   * **Directory indexes**: a `<!-- AUTO:DIRINDEX Group -->` marker on a
//!     page becomes a searchable listing of the documents in that group.
//!
//! Both are markdown [`Plugin`](markdown::Plugin)s. A build is organized as
//! follows:
//!
//! ```svgbob
//!               +--------------+        +--------------+
//!               |   Settings   |        |    Corpus    |
//!               +------+-------+        +------+-------+
//!                      |                       |
//!                      +-----------+-----------+
//!                                  |
//!                         +--------+--------+      +------------+
//!                         |  BuildContext   +------+ BuildCache |
//!                         +--------+--------+      +------------+
//!                                  |
//!          +-----------------------+----------------------+
//!          |                       |                      |
//!  +-------+------+        +-------+------+       +-------+------+
//!  | page: plugins|  ...   | page: plugins|  ...  | page: plugins|
//!  +--------------+        +--------------+       +--------------+
//! ```
//!
//! In words:
//!
//!   1. The docs tree is scanned into a [`Corpus`](corpus::Corpus) of
//!      documents and assets.
//!   2. A [`BuildContext`](context::BuildContext) is made once from the
//!      [`Settings`](config::Settings) and the corpus. It carries the tag
//!      colours, the reference date and a [`BuildCache`](cache::BuildCache)
//!      of indexes derived from the corpus.
//!   3. Every page runs through [`Markdown`](markdown::Markdown) with the
//!      [`FrontMatter`](markdown::FrontMatter),
//!      [`DirIndex`](markdown::DirIndex) and [`Kanban`](markdown::Kanban)
//!      plugins. Pages can be rendered in parallel; the cache builds each
//!      index once and shares it.
)]

#[macro_use]
pub mod error;
pub mod format;
pub mod metadata;
pub mod date;
pub mod text;
pub mod tags;
pub mod url;
pub mod corpus;
pub mod links;
pub mod cache;
pub mod board;
pub mod dir_index;
pub mod config;
pub mod context;
pub mod markdown;

pub use context::{BuildContext, Page};

pub use rayon;
