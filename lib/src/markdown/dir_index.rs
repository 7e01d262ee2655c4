use std::borrow::Cow;

use crate::context::{BuildContext, Page};
use crate::dir_index::{find_marker, render_index, splice};
use crate::error::Result;
use crate::markdown::Plugin;

/// Expands the first `<!-- AUTO:DIRINDEX Group -->` marker on a page into
/// the listing of that group.
#[derive(Debug, Clone, Copy)]
pub struct DirIndex<'c> {
    cx: &'c BuildContext,
    page: &'c Page,
}

impl<'c> DirIndex<'c> {
    pub fn new(cx: &'c BuildContext, page: &'c Page) -> Self {
        DirIndex { cx, page }
    }
}

impl Plugin for DirIndex<'_> {
    fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
        let Some(marker) = find_marker(input) else {
            return Ok(Cow::Borrowed(input));
        };

        let Some((group, roots)) = self.cx.settings.dir_index.group(marker.group) else {
            tracing::debug!(page = %self.page.src_path, group = marker.group, "unknown index group");
            return Ok(Cow::Borrowed(input));
        };

        let entries = self.cx.dir_index_entries(group, roots);
        let html = render_index(&entries, &self.page.url, &self.cx.colors);
        Ok(splice(input, &marker, &html))
    }
}
