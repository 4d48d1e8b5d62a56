use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{MapError, ParseRequestError, Result, Value, VariablePath};

/// The validated `map` field: file field name to the variable paths it fills.
///
/// Keys keep the order of the `map` document, and every key has at least one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMap(IndexMap<String, Vec<VariablePath>>);

impl UploadMap {
    /// Parse the `map` field against the decoded file parts.
    ///
    /// The document must be an object whose values are non-empty lists of strings, else
    /// [`ParseRequestError::InvalidMap`]. Then every key must name a decoded file, else
    /// [`ParseRequestError::MissingFile`]. Only then are the paths themselves checked.
    pub fn parse<T>(map: &str, files: &HashMap<String, T>) -> Result<Self> {
        let value: Value = serde_json::from_str(map).map_err(ParseRequestError::InvalidJson)?;
        let entries = match value {
            Value::Object(entries) => entries,
            _ => return Err(MapError::InvalidShape.into()),
        };

        let mut raw = IndexMap::with_capacity(entries.len());
        for (field_name, paths) in entries {
            let paths = match paths {
                Value::List(paths) => paths,
                _ => return Err(MapError::InvalidShape.into()),
            };
            if paths.is_empty() {
                return Err(MapError::EmptyPaths(field_name).into());
            }
            let paths = paths
                .into_iter()
                .map(|path| match path {
                    Value::String(path) => Ok(path),
                    _ => Err(MapError::InvalidShape),
                })
                .collect::<Result<Vec<_>, _>>()?;
            raw.insert(field_name, paths);
        }

        check_missing(raw.keys(), files)?;

        let upload_map = raw
            .into_iter()
            .map(|(field_name, paths)| {
                let paths = paths
                    .iter()
                    .map(|path| path.parse::<VariablePath>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((field_name, paths))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        Ok(UploadMap(upload_map))
    }

    /// Fail with [`ParseRequestError::MissingFile`] unless every file field the map names was
    /// decoded.
    pub fn check_files<T>(&self, files: &HashMap<String, T>) -> Result<()> {
        check_missing(self.0.keys(), files)
    }

    /// Whether the map names the file field `field_name`.
    pub fn contains(&self, field_name: &str) -> bool {
        self.0.contains_key(field_name)
    }

    /// Iterate over file field names and their paths, in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VariablePath])> {
        self.0
            .iter()
            .map(|(field_name, paths)| (field_name.as_str(), paths.as_slice()))
    }

    /// Number of file fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no file is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn check_missing<'a, T>(
    field_names: impl Iterator<Item = &'a String>,
    files: &HashMap<String, T>,
) -> Result<()> {
    let missing = field_names
        .filter(|field_name| !files.contains_key(field_name.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseRequestError::MissingFile(missing))
    }
}
