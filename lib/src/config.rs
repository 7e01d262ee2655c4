use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{parse_date, parse_utc_offset, Clock};
use crate::error::Result;
use crate::url::UrlStyle;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Board and directory-index settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Case-insensitive substring marking a column as archived.
    pub archive_keyword: String,
    /// Roots tried, in order, when resolving links from live columns.
    pub doc_roots: Vec<String>,
    /// Roots tried, in order, when resolving links from archived columns.
    pub archive_roots: Vec<String>,
    /// Keep only tags that have an entry in the colour store.
    pub restrict_tags: bool,
    /// Path to the tag colour store, JSON or TOML.
    pub tag_colors: Option<PathBuf>,
    /// Zone "today" is computed in, as `+HH:MM`.
    pub utc_offset: String,
    /// Pins "today" to a `YYYY-MM-DD` date.
    pub today: Option<String>,
    pub use_directory_urls: bool,
    /// Title for cards with no text of their own.
    pub untitled: String,
    pub dir_index: DirIndexSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirIndexSettings {
    /// Group name to the roots its documents live under.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Lower-case alias to group name.
    pub aliases: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            archive_keyword: "archiv".into(),
            doc_roots: strings(&["research/Developments", "Developments", "research"]),
            archive_roots: strings(&["research/Archived", "Archived", "research/archived"]),
            restrict_tags: true,
            tag_colors: None,
            utc_offset: "+01:00".into(),
            today: None,
            use_directory_urls: true,
            untitled: crate::board::UNTITLED.into(),
            dir_index: DirIndexSettings::default(),
        }
    }
}

impl Default for DirIndexSettings {
    fn default() -> Self {
        let groups = BTreeMap::from([
            ("Developments".into(), strings(&["research/Developments", "Developments"])),
            ("Archived".into(), strings(&["research/Archived", "Archived"])),
        ]);

        let aliases = [
            ("development", "Developments"),
            ("developments", "Developments"),
            ("archived", "Archived"),
            ("archive", "Archived"),
        ];

        DirIndexSettings {
            groups,
            aliases: aliases.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl DirIndexSettings {
    /// The group `name` refers to, directly or through an alias, with its
    /// roots.
    pub fn group(&self, name: &str) -> Option<(&str, &[String])> {
        let name = name.trim();
        let name = self.aliases.get(&name.to_lowercase()).map_or(name, |g| g.as_str());
        self.groups.get_key_value(name)
            .or_else(|| self.groups.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Settings {
    pub fn url_style(&self) -> UrlStyle {
        UrlStyle::from_directory_urls(self.use_directory_urls)
    }

    pub fn pinned_today(&self) -> Result<Option<NaiveDate>> {
        let Some(today) = &self.today else {
            return Ok(None);
        };

        match parse_date(today.trim()) {
            Some(date) => Ok(Some(date)),
            None => err!("invalid pinned date", "today" => today, "expected `YYYY-MM-DD`"),
        }
    }

    pub fn clock(&self) -> Result<Clock> {
        let offset = parse_utc_offset(&self.utc_offset)?;
        Ok(Clock { offset, pinned: self.pinned_today()? })
    }
}
