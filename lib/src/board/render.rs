use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::board::{assets, Board, Card, Column};
use crate::tags::TagColors;

/// Renders `board` as a self-contained HTML fragment: styles, a filter
/// toolbar, the columns and the filtering script.
///
/// Done cards stay in their column with the `kb-done` class. The "Completed"
/// toggle hides them, in every archive mode alike.
pub fn render_board(board: &Board, colors: &TagColors) -> String {
    let mut buf = String::with_capacity(4096);
    buf.push_str(assets::STYLE);
    buf.push('\n');
    buf.push_str(r#"<div class="kb-wrap" data-kb-wrap="1">"#);
    buf.push('\n');
    toolbar(&mut buf);
    tag_bar(&mut buf, board, colors);

    buf.push_str(r#"<div class="kb-board" data-kb-board="1">"#);
    buf.push('\n');
    for column in &board.columns {
        render_column(&mut buf, column, colors);
    }

    buf.push_str("</div>\n");
    buf.push_str(assets::SCRIPT);
    buf.push_str("\n</div>\n");
    buf
}

fn toolbar(buf: &mut String) {
    buf.push_str(concat!(
        r#"<div class="kb-toolbar">"#,
        r#"<div class="kb-field"><label>Name</label>"#,
        r#"<input class="kb-input" type="search" placeholder="Search..." data-kb-filter="q" /></div>"#,
        r#"<div class="kb-field"><label>Due</label><select class="kb-select" data-kb-filter="status">"#,
        r#"<option value="">Any status</option>"#,
        r#"<option value="past">Overdue</option>"#,
        r#"<option value="soon">Next 7 days</option>"#,
        r#"<option value="later">Later</option>"#,
        r#"<option value="nodate">No date</option>"#,
        r#"</select></div>"#,
        r#"<div class="kb-field"><label>From</label><input class="kb-input" type="date" data-kb-filter="from" /></div>"#,
        r#"<div class="kb-field"><label>To</label><input class="kb-input" type="date" data-kb-filter="to" /></div>"#,
        r#"<label class="kb-check"><input type="checkbox" data-kb-toggle="archived" /><span>Show archived</span></label>"#,
        r#"<label class="kb-check"><input type="checkbox" data-kb-toggle="onlyarchived" /><span>Only archived</span></label>"#,
        r#"<label class="kb-check"><input type="checkbox" data-kb-toggle="done" checked /><span>Completed</span></label>"#,
        "</div>\n",
    ));
}

fn tag_bar(buf: &mut String, board: &Board, colors: &TagColors) {
    if board.tags.is_empty() {
        return;
    }

    buf.push_str(r#"<div class="kb-tagbar">"#);
    for tag in &board.tags {
        let _ = write!(buf,
            r#"<button type="button" class="kb-tagfilter" data-kb-tag="{}" style="{}">#{}</button>"#,
            attr(tag), attr(&colors.style(tag).css_vars()), text(tag));
    }

    buf.push_str("</div>\n");
}

fn render_column(buf: &mut String, column: &Column, colors: &TagColors) {
    let archived = if column.archived { " kb-archived" } else { "" };
    let _ = writeln!(buf, r#"<section class="kb-col{archived}">"#);
    let _ = writeln!(buf, r#"<header class="kb-col-title">{}</header>"#, text(&column.title));
    buf.push_str(r#"<div class="kb-cards">"#);
    buf.push('\n');

    if column.cards.is_empty() {
        buf.push_str("<div class=\"kb-empty\">\u{2014}</div>\n");
    } else {
        for card in &column.cards {
            render_card(buf, card, colors);
        }

        buf.push_str(r#"<div class="kb-empty" data-kb-empty="filtered" style="display:none;">No results</div>"#);
        buf.push('\n');
    }

    buf.push_str("</div></section>\n");
}

fn join<I: IntoIterator<Item = S>, S: AsRef<str>>(items: I) -> String {
    items.into_iter().fold(String::new(), |mut acc, s| {
        if !acc.is_empty() {
            acc.push(',');
        }

        acc.push_str(s.as_ref());
        acc
    })
}

fn render_card(buf: &mut String, card: &Card, colors: &TagColors) {
    let done = if card.done { " kb-done" } else { "" };
    let tag = if card.href.is_some() { "a" } else { "article" };
    let _ = write!(buf, r#"<{tag} class="kb-card{done}""#);
    if let Some(href) = &card.href {
        let _ = write!(buf, r#" href="{}""#, attr(href));
    }

    let _ = writeln!(buf,
        r#" data-title="{}" data-tags="{}" data-dates="{}" data-statuses="{}" data-hasdates="{}">"#,
        attr(&card.title),
        attr(&join(&card.tags_norm)),
        attr(&join(&card.dates_iso)),
        join(card.statuses.iter().map(|s| s.as_str())),
        if card.has_dates() { 1 } else { 0 },
    );

    let _ = writeln!(buf, r#"<div class="kb-card-title">{}</div>"#, text(&card.title));

    if !card.date_items.is_empty() || !card.tags.is_empty() {
        buf.push_str(r#"<div class="kb-meta">"#);
        for item in &card.date_items {
            match item.status {
                Some(status) => { let _ = write!(buf, r#"<span class="kb-chip kb-date {status}">"#); }
                None => buf.push_str(r#"<span class="kb-chip kb-date">"#),
            }

            let _ = write!(buf, "{}</span>", text(&item.raw));
        }

        for tag in &card.tags {
            let _ = write!(buf, r#"<span class="kb-chip kb-tag" style="{}">#{}</span>"#,
                attr(&colors.css(tag)), text(tag));
        }

        buf.push_str("</div>\n");
    }

    let _ = writeln!(buf, "</{tag}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{parse_board, BoardOptions};
    use crate::date::parse_date;
    use crate::metadata::Metadata;

    fn board(text: &str) -> Board {
        let meta = Metadata::new();
        meta.insert_raw("kanban-plugin", "board");
        let options = BoardOptions::new(parse_date("2025-01-01").unwrap());
        parse_board(text, &meta, &options)
    }

    #[test]
    fn cards_carry_filter_attributes() {
        let mut board = board("## Doing\n- [ ] Write <report> #URGENT @{2024-01-01} @{2025-01-03} @{2024-02-31}\n");
        board.columns[0].cards[0].href = Some("../x/?a=1&b=\"2\"".into());
        let html = render_board(&board, &TagColors::default());

        assert!(html.contains(r#"<a class="kb-card" href="../x/?a=1&amp;b=&quot;2&quot;""#));
        assert!(html.contains(r#"data-title="Write <report>""#)
            || html.contains(r#"data-title="Write &lt;report&gt;""#));
        assert!(html.contains(r#"data-tags="URGENT""#));
        assert!(html.contains(r#"data-dates="2024-01-01,2025-01-03""#));
        assert!(html.contains(r#"data-statuses="past,soon""#));
        assert!(html.contains(r#"data-hasdates="1""#));
        assert!(html.contains(r#"<div class="kb-card-title">Write &lt;report&gt;</div>"#));
        assert!(html.contains(r#"<span class="kb-chip kb-date past">2024-01-01</span>"#));
        assert!(html.contains(r#"<span class="kb-chip kb-date">2024-02-31</span>"#));
        assert!(html.contains("background-color: #8080801a; color: #cfcfcf; border-color: #cfcfcf;"));
        assert!(html.contains(r#"data-kb-tag="URGENT""#));
        assert!(html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn unresolved_cards_are_articles() {
        let board = board("## A\n- [x] plain\n## Old archive\n");
        let html = render_board(&board, &TagColors::default());

        assert!(html.contains(r#"<article class="kb-card kb-done""#));
        assert!(html.contains(r#"data-hasdates="0""#));
        assert!(html.contains(r#"<section class="kb-col kb-archived">"#));
        assert!(html.contains("<div class=\"kb-empty\">\u{2014}</div>"));
        assert!(html.contains(r#"data-kb-empty="filtered""#));
        assert!(!html.contains(r#"<div class="kb-tagbar">"#));
    }

    #[test]
    fn output_has_no_blank_lines() {
        let board = board("## A\n- [ ] one #x\n\n\n- [ ] two\n## B\n");
        let html = render_board(&board, &TagColors::default());
        assert!(!html.contains("\n\n"));
        assert!(!assets::STYLE.contains("\n\n"));
        assert!(!assets::SCRIPT.contains("\n\n"));
    }
}
