use std::borrow::Cow;

use pulldown_cmark::Event;

use crate::error::Result;

/// A stage of the markdown pipeline. Text passes through every plugin's
/// `preprocess` in order, then the parsed events through every `remap`.
/// `finalize` runs once rendering is done.
pub trait Plugin {
    #[inline(always)]
    fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(input))
    }

    #[inline(always)]
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        events
    }

    #[inline(always)]
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Plugin for () { }

impl<P: Plugin> Plugin for &mut P {
    fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
        P::preprocess(self, input)
    }

    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        P::remap(self, events)
    }

    fn finalize(&mut self) -> Result<()> {
        P::finalize(self)
    }
}

/// Feeds `input` to `plugin`, keeping the owned buffer when the plugin hands
/// it back untouched.
fn pass<'a, P: Plugin>(plugin: &P, input: Cow<'a, str>) -> Result<Cow<'a, str>> {
    match input {
        Cow::Borrowed(input) => plugin.preprocess(input),
        Cow::Owned(input) => {
            let output = match plugin.preprocess(&input)? {
                Cow::Borrowed(s) if s.as_ptr() == input.as_ptr() && s.len() == input.len() => None,
                Cow::Borrowed(s) => Some(s.to_string()),
                Cow::Owned(s) => Some(s),
            };

            Ok(Cow::Owned(output.unwrap_or(input)))
        }
    }
}

macro_rules! impl_tuple {
    ($($T:ident)+) => (
        #[allow(non_snake_case)]
        impl<$($T: Plugin),+> Plugin for ($($T,)+) {
            fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
                let ($($T,)+) = self;
                let output = Cow::Borrowed(input);
                $(let output = pass($T, output)?;)+
                Ok(output)
            }

            fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
                where I: Iterator<Item = Event<'a>> + 'a
            {
                let ($($T,)+) = self;
                $(let events = $T.remap(events);)+
                events
            }

            fn finalize(&mut self) -> Result<()> {
                let ($($T,)+) = self;
                $($T.finalize()?;)+
                Ok(())
            }
        }
    );
}

impl_tuple!(A);
impl_tuple!(A B);
impl_tuple!(A B C);
impl_tuple!(A B C D);
impl_tuple!(A B C D E);
impl_tuple!(A B C D E F);
