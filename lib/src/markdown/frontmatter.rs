use std::borrow::Cow;

use serde_json::Value;

use crate::error::Result;
use crate::format::{Format, Toml, Yaml};
use crate::metadata::Metadata;

/// Moves a leading `---` YAML or `+++` TOML block into page metadata.
///
/// A block that doesn't parse to a table is logged and left in the text.
#[derive(Debug, Default, Clone)]
pub struct FrontMatter {
    output: Metadata,
}

impl FrontMatter {
    pub fn new(output: Metadata) -> Self {
        Self { output }
    }
}

/// Splits `input` into the body of a block fenced by `fence` lines and the
/// rest of the text.
fn split<'a>(input: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let rest = input.strip_prefix(fence)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }

        offset += line.len();
    }

    None
}

impl crate::markdown::Plugin for FrontMatter {
    fn preprocess<'a>(&self, input: &'a str) -> Result<Cow<'a, str>> {
        let text = input.strip_prefix('\u{feff}').unwrap_or(input);
        let (front, content, yaml) = match split(text, "---") {
            Some((front, content)) => (front, content, true),
            None => match split(text, "+++") {
                Some((front, content)) => (front, content, false),
                None => return Ok(Cow::Borrowed(input)),
            },
        };

        if front.trim().is_empty() {
            return Ok(Cow::Borrowed(content));
        }

        let parsed = match yaml {
            true => Yaml::from_str::<Value>(front).map_err(|e| e.to_string()),
            false => Toml::from_str::<Value>(front).map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(value @ Value::Object(_)) => {
                self.output.append(value);
                Ok(Cow::Borrowed(content))
            }
            Ok(_) => {
                tracing::warn!("front matter is not a table; leaving it in place");
                Ok(Cow::Borrowed(input))
            }
            Err(e) => {
                tracing::warn!("malformed front matter; leaving it in place:\n{e}");
                Ok(Cow::Borrowed(input))
            }
        }
    }
}
