//! Line-level primitives shared by the board parser and the directory index:
//! comment stripping, wikilinks, `@{date}` tokens, `#tag` tokens, and the
//! normalizations applied to tags and document names.
//!
//! Every function here is total: malformed input is left in place rather than
//! rejected.

use std::borrow::Cow;

use memchr::memmem;

const COMMENT: &str = "%%";
const FENCE: &str = "```";
const SETTINGS_KEYWORD: &str = "kanban:settings";

/// Removes every `%% ... %%` annotation, pairing each opening marker with the
/// nearest closing one. An unterminated marker removes everything after it.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    let Some(first) = memmem::find(text.as_bytes(), COMMENT.as_bytes()) else {
        return Cow::Borrowed(text);
    };

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut next = Some(first);
    while let Some(start) = next {
        output.push_str(&rest[..start]);
        let body = &rest[start + COMMENT.len()..];
        match memmem::find(body.as_bytes(), COMMENT.as_bytes()) {
            Some(end) => rest = &body[end + COMMENT.len()..],
            None => return Cow::Owned(output),
        }

        next = memmem::find(rest.as_bytes(), COMMENT.as_bytes());
    }

    output.push_str(rest);
    Cow::Owned(output)
}

/// Removes fenced code blocks that carry the board's `kanban:settings`
/// payload. Fences pair up in order; an unterminated settings fence removes
/// everything after it. `%%`-delimited settings are handled by
/// [`strip_comments()`].
pub fn strip_board_settings(text: &str) -> Cow<'_, str> {
    let lowered = text.to_ascii_lowercase();
    if memmem::find(lowered.as_bytes(), SETTINGS_KEYWORD.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut cursor = 0;
    let finder = memmem::Finder::new(FENCE);
    while let Some(open) = finder.find(&lowered.as_bytes()[cursor..]).map(|i| cursor + i) {
        let body_start = open + FENCE.len();
        let close = finder.find(&lowered.as_bytes()[body_start..]).map(|i| body_start + i);
        let body_end = close.unwrap_or(lowered.len());
        let is_settings = memmem::find(&lowered.as_bytes()[body_start..body_end], SETTINGS_KEYWORD.as_bytes())
            .is_some();

        match close {
            Some(close) if is_settings => {
                output.push_str(&text[copied..open]);
                copied = close + FENCE.len();
                cursor = copied;
            }
            Some(close) => cursor = close + FENCE.len(),
            None if is_settings => return Cow::Owned(output + &text[copied..open]),
            None => break,
        }
    }

    output.push_str(&text[copied..]);
    Cow::Owned(output)
}

/// One `[[target]]` or `[[target|label]]` token, as found in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WikiLink<'a> {
    /// Byte offset of the opening `[[`.
    pub start: usize,
    /// Byte offset just past the closing `]]`.
    pub end: usize,
    pub target: &'a str,
    pub label: Option<&'a str>,
}

impl<'a> WikiLink<'a> {
    /// The text the link reads as: its label if it has one, else its target.
    pub fn text(&self) -> &'a str {
        self.label.unwrap_or(self.target)
    }
}

/// Matches a wikilink starting exactly at `start`, which must point at `[[`.
fn wikilink_at(s: &str, start: usize) -> Option<WikiLink<'_>> {
    let body = &s[start + 2..];
    let target_len = body.find([']', '|'])?;
    if target_len == 0 {
        return None;
    }

    let target = &body[..target_len];
    let after = &body[target_len..];
    if let Some(tail) = after.strip_prefix("]]") {
        let end = s.len() - tail.len();
        return Some(WikiLink { start, end, target, label: None });
    }

    let labelled = after.strip_prefix('|')?;
    let label_len = labelled.find(']')?;
    let tail = labelled[label_len..].strip_prefix("]]")?;
    if label_len == 0 {
        return None;
    }

    let end = s.len() - tail.len();
    Some(WikiLink { start, end, target, label: Some(&labelled[..label_len]) })
}

/// Iterates over the non-overlapping wikilinks in `s`, left to right.
pub fn wikilinks(s: &str) -> impl Iterator<Item = WikiLink<'_>> + '_ {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(i) = memmem::find(&s.as_bytes()[cursor..], b"[[") {
            let start = cursor + i;
            match wikilink_at(s, start) {
                Some(link) => {
                    cursor = link.end;
                    return Some(link);
                }
                None => cursor = start + 1,
            }
        }

        cursor = s.len();
        None
    })
}

/// The first wikilink's trimmed `(target, label)`. `None` if there is no link
/// or the first link's target is blank.
pub fn first_wikilink(s: &str) -> Option<(&str, &str)> {
    let link = wikilinks(s).next()?;
    let target = link.target.trim();
    if target.is_empty() {
        return None;
    }

    Some((target, link.text().trim()))
}

/// Replaces every wikilink with its label, or its target when unlabelled.
pub fn wikilinks_to_text(s: &str) -> Cow<'_, str> {
    let mut links = wikilinks(s).peekable();
    if links.peek().is_none() {
        return Cow::Borrowed(s);
    }

    let mut output = String::with_capacity(s.len());
    let mut copied = 0;
    for link in links {
        output.push_str(&s[copied..link.start]);
        output.push_str(link.text());
        copied = link.end;
    }

    output.push_str(&s[copied..]);
    Cow::Owned(output)
}

/// Matches `@{DDDD-DD-DD}` at the start of `s`, returning the inner date.
fn date_token(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() < 13 || !bytes.starts_with(b"@{") || bytes[12] != b'}' {
        return None;
    }

    let shape_ok = bytes[2..12].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });

    shape_ok.then(|| &s[2..12])
}

/// Extracts every `@{YYYY-MM-DD}` token in source order. Returns the raw date
/// strings and `text` with the tokens removed, trimmed.
///
/// Only the token's shape is checked here: `@{2024-13-45}` is extracted and
/// left for [`crate::date::parse_date()`] to reject.
pub fn extract_dates(text: &str) -> (Vec<String>, String) {
    let mut dates = vec![];
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut cursor = 0;
    while let Some(i) = memchr::memchr(b'@', &text.as_bytes()[cursor..]) {
        let at = cursor + i;
        match date_token(&text[at..]) {
            Some(date) => {
                output.push_str(&text[copied..at]);
                dates.push(date.to_string());
                copied = at + 13;
                cursor = copied;
            }
            None => cursor = at + 1,
        }
    }

    output.push_str(&text[copied..]);
    (dates, output.trim().to_string())
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[inline]
fn is_tag_char(c: char) -> bool {
    is_word_char(c) || c == '-' || c == '/'
}

/// Extracts every `#tag` token not preceded by a word character, in source
/// order. Returns the tags without their `#` and `text` with the tokens
/// removed, trimmed.
pub fn extract_tags(text: &str) -> (Vec<String>, String) {
    let mut tags = vec![];
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let starts_tag = c == '#'
            && !prev.is_some_and(is_word_char)
            && chars.peek().is_some_and(|&(_, n)| is_tag_char(n));

        if !starts_tag {
            prev = Some(c);
            continue;
        }

        let body = i + 1;
        let mut end = body;
        while let Some(&(j, n)) = chars.peek() {
            if !is_tag_char(n) {
                break;
            }

            end = j + n.len_utf8();
            prev = Some(n);
            chars.next();
        }

        output.push_str(&text[copied..i]);
        tags.push(text[body..end].to_string());
        copied = end;
    }

    output.push_str(&text[copied..]);
    (tags, output.trim().to_string())
}

/// Canonical form of a tag: surrounding whitespace and leading `#`s removed,
/// upper-cased. Whitespace between or after the leading `#`s goes too, so
/// `" # foo "` is `FOO`. Idempotent.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .trim_end()
        .to_uppercase()
}

/// Collapses runs of whitespace into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A filename-safe lookup key for a link target or document path: the last
/// path segment, lower-cased and transliterated, without a `.md` extension,
/// whitespace and underscores as hyphens, other punctuation dropped.
///
/// ```
/// use corkboard::text::name_key;
///
/// assert_eq!(name_key("research/Report_Draft.md"), "report-draft");
/// assert_eq!(name_key("Ideas  &  Notes"), "ideas-notes");
/// assert_eq!(name_key("Café Plan"), "cafe-plan");
/// ```
pub fn name_key(target: &str) -> String {
    let trimmed = target.trim().trim_end_matches(['/', '\\']);
    let segment = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let segment = crate::url::strip_md(segment);

    let mut output = String::with_capacity(segment.len());
    for b in deunicode::deunicode(segment).bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => output.push(b.to_ascii_lowercase() as char),
            b' ' | b'\t' | b'\n' | b'\r' | b'_' | b'-' => {
                if !output.is_empty() && !output.ends_with('-') {
                    output.push('-');
                }
            }
            _ => {}
        }
    }

    while output.ends_with('-') {
        output.pop();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_stripped_pairwise() {
        assert_eq!(strip_comments("a %%x%% b %%y\nz%% c"), "a  b  c");
        assert_eq!(strip_comments("no comments"), "no comments");
        assert!(matches!(strip_comments("no comments"), Cow::Borrowed(_)));
        assert_eq!(strip_comments("keep %% open\nstill gone"), "keep ");
        assert_eq!(strip_comments("%%%%tail"), "tail");
    }

    #[test]
    fn settings_fences_are_stripped() {
        let text = "## A\n```json\nplain\n```\n- [ ] x\n```\n{\"kanban:settings\": 1}\n```\nend";
        assert_eq!(strip_board_settings(text), "## A\n```json\nplain\n```\n- [ ] x\n\nend");

        let upper = "a\n```\nKANBAN:SETTINGS\n```";
        assert_eq!(strip_board_settings(upper), "a\n");

        let open = "a\n```\nkanban:settings {}";
        assert_eq!(strip_board_settings(open), "a\n");

        let unrelated = "```\ncode\n```";
        assert_eq!(strip_board_settings(unrelated), unrelated);
    }

    #[test]
    fn wikilink_shapes() {
        let links: Vec<_> = wikilinks("[[A]] and [[B|Bee]] [[|x]] [[C|]] [[D]").collect();
        assert_eq!(links.len(), 2);
        assert_eq!((links[0].target, links[0].label), ("A", None));
        assert_eq!((links[1].target, links[1].label), ("B", Some("Bee")));
        assert_eq!(links[1].text(), "Bee");

        assert_eq!(first_wikilink("x [[ Target | Label ]] y"), Some(("Target", "Label")));
        assert_eq!(first_wikilink("x [[Target]]"), Some(("Target", "Target")));
        assert_eq!(first_wikilink("[[  ]] [[Later]]"), None);
        assert_eq!(first_wikilink("none"), None);
    }

    #[test]
    fn wikilinks_become_labels() {
        assert_eq!(wikilinks_to_text("see [[A]] and [[B|the b]]."), "see A and the b.");
        assert_eq!(wikilinks_to_text("[[[x]]"), "[x");
        assert!(matches!(wikilinks_to_text("plain [[ text"), Cow::Borrowed(_)));
    }

    #[test]
    fn dates_extracted_in_order() {
        let (dates, rest) = extract_dates("a @{2024-05-01} b @{2024-13-45} @{soon} c @{2023-01-01}");
        assert_eq!(dates, ["2024-05-01", "2024-13-45", "2023-01-01"]);
        assert_eq!(rest, "a  b  @{soon} c");

        let (dates, rest) = extract_dates("  nothing here ");
        assert!(dates.is_empty());
        assert_eq!(rest, "nothing here");
    }

    #[test]
    fn tags_need_a_word_boundary() {
        let (tags, rest) = extract_tags("fix #Bug-1 in a#b and #area/sub_x, #");
        assert_eq!(tags, ["Bug-1", "area/sub_x"]);
        assert_eq!(rest, "fix  in a#b and , #");

        let (tags, rest) = extract_tags("#first#second (#third) #ñandú");
        assert_eq!(tags, ["first", "third", "ñandú"]);
        assert_eq!(rest, "#second ()");
    }

    #[test]
    fn tag_normalization_is_idempotent() {
        for tag in ["#Foo", "foo", "FOO", " # foo ", "##bar/baz", "straße", "área-1"] {
            let once = normalize_tag(tag);
            assert_eq!(normalize_tag(&once), once);
        }

        assert_eq!(normalize_tag("#Foo"), "FOO");
        assert_eq!(normalize_tag(" # foo "), "FOO");
        assert_eq!(normalize_tag("foo"), normalize_tag("FOO"));
        assert_eq!(normalize_tag("#Foo"), normalize_tag("foo"));
    }

    #[test]
    fn name_keys() {
        assert_eq!(name_key("ReportDraft"), "reportdraft");
        assert_eq!(name_key("Developments/Big Plan.MD"), "big-plan");
        assert_eq!(name_key("a\\b\\c__d"), "c-d");
        assert_eq!(name_key(" -- odd -- "), "odd");
        assert_eq!(name_key("dir/"), "dir");
        assert_eq!(name_key("¿?"), "");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("  a \t b\n c  "), "a b c");
    }
}
