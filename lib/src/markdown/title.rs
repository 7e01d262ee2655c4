use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};

use crate::error::Result;
use crate::markdown::Plugin;
use crate::metadata::{MetaKey, Metadata, Title};

#[derive(Debug, Default)]
enum State {
    #[default]
    Waiting,
    Reading(String),
    Done(String),
}

/// Records the text of the first level-1 heading as the page `title`, unless
/// the page already has one.
#[derive(Debug, Default)]
pub struct PageTitle {
    output: Metadata,
    state: State,
}

impl PageTitle {
    pub fn new(output: Metadata) -> Self {
        Self { output, state: State::Waiting }
    }
}

impl Plugin for PageTitle {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        self.state = State::Waiting;
        events.inspect(|ev| match (&mut self.state, ev) {
            (State::Waiting, Event::Start(Tag::Heading { level: HeadingLevel::H1, .. })) => {
                self.state = State::Reading(String::new());
            }
            (State::Reading(title), Event::Text(text) | Event::Code(text)) => title.push_str(text),
            (State::Reading(title), Event::End(TagEnd::Heading(HeadingLevel::H1))) => {
                self.state = State::Done(std::mem::take(title));
            }
            _ => {}
        })
    }

    fn finalize(&mut self) -> Result<()> {
        if let State::Done(title) = &self.state {
            if !title.trim().is_empty() && !self.output.contains_key(Title::KEY) {
                self.output.insert_raw(Title::KEY, title.trim());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{FrontMatter, Markdown};

    #[test]
    fn first_h1_becomes_title() {
        let meta = Metadata::new();
        Markdown::from("intro\n\n## Not this\n\n# The `real` one\n\n# Later\n")
            .plugins((PageTitle::new(meta.clone()),))
            .run()
            .unwrap();

        assert_eq!(meta.get_str("title").as_deref(), Some("The real one"));
    }

    #[test]
    fn front_matter_title_wins() {
        let meta = Metadata::new();
        Markdown::from("---\ntitle: Given\n---\n# Heading\n")
            .plugins((FrontMatter::new(meta.clone()), PageTitle::new(meta.clone())))
            .run()
            .unwrap();

        assert_eq!(meta.get_str("title").as_deref(), Some("Given"));
    }
}
