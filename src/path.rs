use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::{MapError, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn parse(segment: &str) -> Segment {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(idx) = segment.parse() {
                return Segment::Index(idx);
            }
        }
        Segment::Key(segment.to_string())
    }
}

/// A path from the `map` field, such as `variables.folder.files.1`.
///
/// The leading `variables` is checked on parse and dropped. Numeric segments index lists, any
/// other segment is an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariablePath {
    raw: String,
    segments: Vec<Segment>,
}

impl FromStr for VariablePath {
    type Err = MapError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut parts = path.split('.');
        if parts.next() != Some("variables") {
            return Err(MapError::InvalidRoot(path.to_string()));
        }

        let segments = parts
            .map(|part| {
                if part.is_empty() {
                    Err(MapError::EmptySegment(path.to_string()))
                } else {
                    Ok(Segment::parse(part))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        if segments.is_empty() {
            return Err(MapError::EmptySegment(path.to_string()));
        }

        Ok(VariablePath {
            raw: path.to_string(),
            segments,
        })
    }
}

impl Display for VariablePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl VariablePath {
    /// The path as the client wrote it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The name of the variable this path starts in.
    pub fn variable_name(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(name)) => Some(name),
            _ => None,
        }
    }

    /// Walk the path and borrow the slot it ends on.
    ///
    /// Nothing is created along the way, every container on the path must already exist.
    pub(crate) fn resolve_mut<'a>(
        &self,
        variables: &'a mut IndexMap<String, Value>,
    ) -> Result<&'a mut Value, MapError> {
        let not_found = || MapError::PathNotFound(self.raw.clone());
        let (first, rest) = self.segments.split_first().ok_or_else(not_found)?;
        let root = match first {
            Segment::Key(name) => variables.get_mut(name.as_str()),
            Segment::Index(_) => None,
        }
        .ok_or_else(not_found)?;

        rest.iter()
            .try_fold(root, |current, segment| match (current, segment) {
                (Value::List(list), Segment::Index(idx)) => list.get_mut(*idx),
                (Value::Object(obj), Segment::Key(key)) => obj.get_mut(key.as_str()),
                _ => None,
            })
            .ok_or_else(not_found)
    }
}
