use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Chainable, ErrorDetail, Result};

pub trait Format: Sized {
    /// The data format's error type.
    type Error: serde::de::Error + ErrorDetail + 'static;

    /// Parses `string` as the data format `Self` into a `T`, or returns an
    /// error if `string` is not a valid `T`.
    fn from_str<T: DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    /// Reads the file at `path` and parses it via [`Format::from_str()`].
    fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let string = std::fs::read_to_string(path)
            .chain_with(|| error!("failed to read data file", "path" => path.display()))?;

        Self::from_str(&string)
            .chain_with(|| error!("failed to parse data file", "path" => path.display()))
    }
}

macro_rules! impl_format {
    ($name:ident : $func:expr, $E:ty) => (
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Format for $name {
            type Error = $E;

            fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    );
}

impl_format!(Toml: toml::from_str, toml::de::Error);
impl_format!(Json: serde_json::from_str, serde_json::Error);
impl_format!(Yaml: serde_yaml::from_str, serde_yaml::Error);

/// Reads a JSON, TOML or YAML file, choosing the format by extension. Unknown
/// extensions are read as JSON.
pub fn read_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("toml") => Toml::read(path),
        Some("yaml" | "yml") => Yaml::read(path),
        _ => Json::read(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Point { x: i32, y: i32 }

    #[test]
    fn formats_parse_the_same_value() {
        let expected = Point { x: 1, y: 2 };
        assert_eq!(Toml::from_str::<Point>("x = 1\ny = 2").unwrap(), expected);
        assert_eq!(Json::from_str::<Point>(r#"{"x": 1, "y": 2}"#).unwrap(), expected);
        assert_eq!(Yaml::from_str::<Point>("x: 1\ny: 2").unwrap(), expected);
    }

    #[test]
    fn extension_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.toml");
        std::fs::write(&path, "x = 3\ny = 4").unwrap();
        let point: Point = read_by_extension(&path).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });

        let missing = read_by_extension::<Point>(&dir.path().join("nope.json"));
        assert!(missing.is_err());
    }
}
