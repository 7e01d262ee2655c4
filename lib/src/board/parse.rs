use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::board::{Board, BoardOptions, Card, Column, DateItem};
use crate::date::{parse_date, DateStatus};
use crate::metadata::{KanbanPlugin, Metadata};
use crate::text;

/// How many leading lines are sniffed for an embedded board marker.
const SNIFF_LINES: usize = 30;

/// Whether `text` is a kanban board: either its metadata says so, or its
/// first 30 lines mention both `kanban-plugin:` and `board`. Markers further
/// down are not seen.
pub fn is_board(text: &str, meta: &Metadata) -> bool {
    if let Some(Ok(kind)) = meta.get(KanbanPlugin) {
        if kind == "board" {
            return true;
        }
    }

    let head = text.lines()
        .take(SNIFF_LINES)
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    head.contains("kanban-plugin:") && head.contains("board")
}

/// `## Title` with at least one whitespace after the hashes.
fn heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

/// `- [ ] body` or `- [x] body`, tolerating whitespace around the dash.
fn task(line: &str) -> Option<(bool, &str)> {
    let rest = line.trim_start().strip_prefix('-')?.trim_start();
    let rest = rest.strip_prefix('[')?;
    let mut chars = rest.chars();
    let done = match chars.next()? {
        ' ' => false,
        'x' | 'X' => true,
        _ => return None,
    };

    let body = chars.as_str().strip_prefix(']')?;
    Some((done, body.trim()))
}

enum ScanState {
    BeforeColumn,
    InColumn(Column),
}

/// Parses a board. Returns an empty [`Board`] if `text` isn't one.
///
/// Level-2 headings open columns; checklist items become cards of the open
/// column. Every other line is ignored, including anything before the first
/// heading and continuation lines under a card.
pub fn parse_board(text: &str, meta: &Metadata, options: &BoardOptions<'_>) -> Board {
    if !is_board(text, meta) {
        return Board::default();
    }

    let stripped = text::strip_comments(text);
    let stripped = text::strip_board_settings(&stripped);

    let keyword = options.archive_keyword.to_lowercase();
    let mut board = Board::default();
    let mut state = ScanState::BeforeColumn;
    for line in stripped.lines() {
        if let Some(title) = heading(line) {
            let archived = !keyword.is_empty() && title.to_lowercase().contains(&keyword);
            let column = Column { title: title.to_string(), archived, cards: vec![] };
            if let ScanState::InColumn(done) = std::mem::replace(&mut state, ScanState::InColumn(column)) {
                board.columns.push(done);
            }

            continue;
        }

        let ScanState::InColumn(column) = &mut state else {
            continue;
        };

        if let Some((done, body)) = task(line) {
            let card = parse_card(done, body, options);
            board.tags.extend(card.tags_norm.iter().cloned());
            column.cards.push(card);
        }
    }

    if let ScanState::InColumn(column) = state {
        board.columns.push(column);
    }

    board
}

fn parse_card(done: bool, body: &str, options: &BoardOptions<'_>) -> Card {
    // Only the first link navigates; it leaves the title. Later links read as
    // their labels.
    let first = text::wikilinks(body).next();
    let target = first.map(|link| link.target.trim()).filter(|t| !t.is_empty());
    let body = match (first, target) {
        (Some(link), Some(_)) => Cow::Owned(format!("{}{}", &body[..link.start], &body[link.end..])),
        _ => Cow::Borrowed(body),
    };

    let body = text::wikilinks_to_text(&body);
    let (dates, rest) = text::extract_dates(&body);
    let (tags_raw, rest) = text::extract_tags(&rest);

    let title = text::collapse_whitespace(&rest);
    let title = match title.trim_matches(|c: char| c == ' ' || c == '-') {
        "" => options.untitled.to_string(),
        title => title.to_string(),
    };

    let allowed = |norm: &String| options.allowed_tags.map_or(true, |allow| allow.contains(norm));
    let tags_norm: BTreeSet<String> = tags_raw.iter()
        .map(|t| text::normalize_tag(t))
        .filter(allowed)
        .collect();

    let tags = tags_raw.into_iter()
        .filter(|t| allowed(&text::normalize_tag(t)))
        .collect();

    let mut date_items = Vec::with_capacity(dates.len());
    let mut dates_iso = vec![];
    let mut statuses = BTreeSet::new();
    for raw in dates {
        let status = parse_date(&raw).map(|date| DateStatus::of(date, options.today));
        if let Some(status) = status {
            statuses.insert(status);
            dates_iso.push(raw.clone());
        }

        date_items.push(DateItem { raw, status });
    }

    Card {
        done,
        title,
        target: target.map(String::from),
        href: None,
        date_items,
        tags,
        tags_norm,
        dates_iso,
        statuses,
    }
}
