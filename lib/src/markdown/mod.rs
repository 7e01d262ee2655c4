//! Markdown rendering with a pipeline of [`Plugin`]s.
//!
//! A page typically runs through:
//!
//! ```rust,ignore
//! Markdown::from(&text)
//!     .plugins((
//!         FrontMatter::new(page.meta.clone()),
//!         DirIndex::new(&cx, &page),
//!         Kanban::new(&cx, &page),
//!         PageTitle::new(page.meta.clone()),
//!     ))
//!     .run()?
//! ```

mod plugin;
mod markdown;
mod frontmatter;
mod title;
mod kanban;
mod dir_index;

pub use plugin::*;
pub use markdown::*;
pub use frontmatter::*;
pub use title::*;
pub use kanban::*;
pub use dir_index::*;
