use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::text::normalize_tag;

/// The store key holding the style for tags without their own entry.
pub const DEFAULT_KEY: &str = "__default__";

const DEFAULT_BG: &str = "#8080801a";
const DEFAULT_FG: &str = "#cfcfcf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStyle {
    #[serde(default = "TagStyle::default_bg")]
    pub bg: String,
    #[serde(default = "TagStyle::default_fg")]
    pub fg: String,
}

impl TagStyle {
    fn default_bg() -> String { DEFAULT_BG.into() }

    fn default_fg() -> String { DEFAULT_FG.into() }

    /// Inline CSS for a chip that is always coloured.
    pub fn css(&self) -> String {
        format!("background-color: {}; color: {}; border-color: {};", self.bg, self.fg, self.fg)
    }

    /// Inline CSS variables for a filter chip coloured only when active.
    pub fn css_vars(&self) -> String {
        format!("--tg-bg:{};--tg-fg:{};", self.bg, self.fg)
    }
}

impl Default for TagStyle {
    fn default() -> Self {
        TagStyle { bg: Self::default_bg(), fg: Self::default_fg() }
    }
}

/// Tag colours keyed by normalized tag, with a fallback style.
#[derive(Debug, Clone, Default)]
pub struct TagColors {
    styles: FxHashMap<String, TagStyle>,
    default: TagStyle,
}

impl TagColors {
    /// Builds the registry from a raw key-value store. Keys are normalized,
    /// non-object values are skipped, and [`DEFAULT_KEY`] sets the fallback.
    pub fn from_map(raw: serde_json::Map<String, Value>) -> Self {
        let mut colors = TagColors::default();
        for (key, value) in raw {
            if !value.is_object() {
                tracing::debug!(%key, "skipping non-object tag colour entry");
                continue;
            }

            let style: TagStyle = match serde_json::from_value(value) {
                Ok(style) => style,
                Err(e) => {
                    tracing::debug!(%key, "skipping malformed tag colour entry: {e}");
                    continue;
                }
            };

            match key.as_str() {
                DEFAULT_KEY => colors.default = style,
                _ => { colors.styles.insert(normalize_tag(&key), style); }
            }
        }

        colors
    }

    /// Reads the store at `path` as JSON or TOML (by extension).
    pub fn try_load(path: &Path) -> Result<Self> {
        let raw: serde_json::Map<String, Value> = crate::format::read_by_extension(path)?;
        Ok(TagColors::from_map(raw))
    }

    /// Like [`TagColors::try_load()`], but falls back to the default-only
    /// registry if the store is unreadable or malformed.
    pub fn load(path: &Path) -> Self {
        match TagColors::try_load(path) {
            Ok(colors) => colors,
            Err(e) => {
                tracing::warn!(path = %path.display(), "using default tag colours:\n{e}");
                TagColors::default()
            }
        }
    }

    pub fn style(&self, tag: &str) -> &TagStyle {
        self.styles.get(&normalize_tag(tag)).unwrap_or(&self.default)
    }

    pub fn css(&self, tag: &str) -> String {
        self.style(tag).css()
    }

    /// The normalized tags with an explicit style. Excludes the fallback.
    pub fn allow_list(&self) -> FxHashSet<String> {
        self.styles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
