use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a source document maps to the URL it is served at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
    /// `a/b.md` is served at `a/b/` from `a/b/index.html`.
    #[default]
    Directory,
    /// `a/b.md` is served at `a/b.html`.
    File,
}

/// Splits a source path into `(directory, stem, is_index)`, with `\`
/// separators normalized and the `.md` extension removed.
fn split_source(src_path: &str) -> (String, String, bool) {
    let normalized = src_path.replace('\\', "/");
    let path = normalized.trim_start_matches('/');
    let stem = strip_md(path);
    let (dir, name) = match stem.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", stem),
    };

    let is_index = name.eq_ignore_ascii_case("index") || name.eq_ignore_ascii_case("readme");
    (dir.to_string(), stem.to_string(), is_index)
}

/// `path` without a trailing, case-insensitive `.md`.
pub fn strip_md(path: &str) -> &str {
    match path.len().checked_sub(3) {
        Some(i) if path.is_char_boundary(i) && path[i..].eq_ignore_ascii_case(".md") => &path[..i],
        _ => path,
    }
}

fn join(dir: &str, rest: &str) -> String {
    match dir.is_empty() {
        true => rest.to_string(),
        false => format!("{dir}/{rest}"),
    }
}

impl UrlStyle {
    pub fn from_directory_urls(use_directory_urls: bool) -> Self {
        match use_directory_urls {
            true => UrlStyle::Directory,
            false => UrlStyle::File,
        }
    }

    /// The site-root-relative URL of the page built from `src_path`.
    ///
    /// ```
    /// use corkboard::url::UrlStyle;
    ///
    /// assert_eq!(UrlStyle::Directory.page_url("a/b.md"), "a/b/");
    /// assert_eq!(UrlStyle::Directory.page_url("a/index.md"), "a/");
    /// assert_eq!(UrlStyle::Directory.page_url("README.md"), "./");
    /// assert_eq!(UrlStyle::File.page_url("a/b.md"), "a/b.html");
    /// assert_eq!(UrlStyle::File.page_url("a/README.md"), "a/index.html");
    /// ```
    pub fn page_url(&self, src_path: &str) -> String {
        let (dir, stem, is_index) = split_source(src_path);
        match (self, is_index) {
            (UrlStyle::Directory, true) if dir.is_empty() => "./".into(),
            (UrlStyle::Directory, true) => format!("{dir}/"),
            (UrlStyle::Directory, false) => format!("{stem}/"),
            (UrlStyle::File, true) => join(&dir, "index.html"),
            (UrlStyle::File, false) => format!("{stem}.html"),
        }
    }

    /// The output file, relative to the site directory, for `src_path`.
    pub fn dest_path(&self, src_path: &str) -> PathBuf {
        let (dir, stem, is_index) = split_source(src_path);
        let dest = match (self, is_index) {
            (_, true) => join(&dir, "index.html"),
            (UrlStyle::Directory, false) => format!("{stem}/index.html"),
            (UrlStyle::File, false) => format!("{stem}.html"),
        };

        PathBuf::from(dest)
    }

    /// The URL a page at `path` would have, without consulting any corpus.
    pub fn guess_url(&self, path: &str) -> String {
        let base = strip_md(path.trim().trim_matches('/'));
        let base = base.trim_end_matches('/');
        match self {
            UrlStyle::Directory => format!("{base}/"),
            UrlStyle::File => format!("{base}.html"),
        }
    }
}

/// Splits a URL into path segments, dropping empty and `.` segments and
/// folding `..` into its parent.
fn segments(url: &str) -> Vec<&str> {
    let mut parts = vec![];
    for part in url.split('/') {
        match part {
            "" | "." => continue,
            ".." => { parts.pop(); }
            part => parts.push(part),
        }
    }

    parts
}

/// The URL of `to` relative to the page at `from`. Both are site-root
/// relative. A trailing `/` on `to` is kept.
///
/// ```
/// use corkboard::url::relative_url;
///
/// assert_eq!(relative_url("a/b/", "a/c/"), "../b/");
/// assert_eq!(relative_url("a/b/", "./"), "a/b/");
/// assert_eq!(relative_url("a/", "a/"), "./");
/// assert_eq!(relative_url("a/b.html", "a/c.html"), "b.html");
/// assert_eq!(relative_url("x.html", "a/b/c.html"), "../../x.html");
/// ```
pub fn relative_url(to: &str, from: &str) -> String {
    let from = match from.rsplit_once('/') {
        Some((dir, file)) if file.contains('.') => dir,
        None if from.contains('.') && from != "." => "",
        _ => from,
    };

    let from = segments(from);
    let dest = segments(to);
    let common = from.iter().zip(dest.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&dest[common..]);

    let mut url = match parts.is_empty() {
        true => ".".to_string(),
        false => parts.join("/"),
    };

    if to.ends_with('/') {
        url.push('/');
    }

    url
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn dest_paths() {
        assert_eq!(UrlStyle::Directory.dest_path("a/b.md"), Path::new("a/b/index.html"));
        assert_eq!(UrlStyle::Directory.dest_path("index.md"), Path::new("index.html"));
        assert_eq!(UrlStyle::Directory.dest_path("a\\Readme.md"), Path::new("a/index.html"));
        assert_eq!(UrlStyle::File.dest_path("a/b.MD"), Path::new("a/b.html"));
    }

    #[test]
    fn guessed_urls() {
        assert_eq!(UrlStyle::Directory.guess_url("research/Developments/Plan.md"), "research/Developments/Plan/");
        assert_eq!(UrlStyle::File.guess_url("/Plan/"), "Plan.html");
    }

    #[test]
    fn relative_urls() {
        assert_eq!(relative_url("Developments/Plan/", "boards/main/"), "../../Developments/Plan/");
        assert_eq!(relative_url("./", "a/b/"), "../../");
        assert_eq!(relative_url("a/b/c/", "a/b/"), "c/");
        assert_eq!(relative_url("a/x/../b/", "a/"), "b/");
        assert_eq!(relative_url("index.html", "index.html"), "index.html");
    }
}
