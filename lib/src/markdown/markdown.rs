use pulldown_cmark::{html, Options, Parser};

use crate::error::{Chainable, Result};
use crate::markdown::Plugin;

#[derive(Debug, Clone)]
pub struct Markdown<'i, P = ()> {
    input: &'i str,
    options: Options,
    plugins: P,
}

impl<'i> Markdown<'i, ()> {
    pub fn from(input: &'i str) -> Self {
        Self {
            input,
            options: Options::all().difference(Options::ENABLE_SMART_PUNCTUATION),
            plugins: (),
        }
    }
}

impl<'i, P: Plugin> Markdown<'i, P> {
    /// Replaces the plugins. Pass a tuple to run several, in order.
    pub fn plugins<Q: Plugin>(self, plugins: Q) -> Markdown<'i, Q> {
        Markdown {
            input: self.input,
            options: self.options,
            plugins,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Runs the pipeline and renders the result to HTML.
    pub fn run(mut self) -> Result<String> {
        let input = self.plugins.preprocess(self.input)
            .chain(error!("markdown preprocessing failed"))?;

        let mut output = String::with_capacity(input.len() + input.len() / 2);
        let parser = Parser::new_ext(&input, self.options);
        html::push_html(&mut output, self.plugins.remap(parser));

        self.plugins.finalize().chain(error!("markdown plugin failed"))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    struct Shout;

    impl Plugin for Shout {
        fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
            Ok(Cow::Owned(input.replace("hello", "HELLO")))
        }
    }

    struct Fails;

    impl Plugin for Fails {
        fn finalize(&mut self) -> Result<()> {
            err!("out of ink")
        }
    }

    #[test]
    fn renders_through_plugins() {
        let html = Markdown::from("# hello\n\n*\"quoted\"*").run().unwrap();
        assert!(html.contains("<h1>hello</h1>"));
        assert!(html.contains("<em>\"quoted\"</em>"));

        let html = Markdown::from("hello").plugins((Shout,)).run().unwrap();
        assert_eq!(html, "<p>HELLO</p>\n");

        let html = Markdown::from("<div>\nraw\n</div>\n\nafter").run().unwrap();
        assert!(html.starts_with("<div>\nraw\n</div>\n"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn finalize_errors_are_chained() {
        let error = Markdown::from("x").plugins((Shout, Fails)).run().unwrap_err();
        assert_eq!(error.message(), "markdown plugin failed");
        assert!(error.to_string().contains("out of ink"));
    }
}
