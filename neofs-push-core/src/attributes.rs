//! Object attribute compilation.
//!
//! The same [`AttributeSet`] is built for an upload (`Assign` rendering) and for the search
//! that finds the object it replaces (`Filter` rendering, without content type), so a
//! stale object is found by exactly the attributes its replacement will carry.

use crate::error::PublishError;

/// Attribute holding the object's logical path; the identity key for reconciliation.
pub const FILE_PATH: &str = "FilePath";
pub const CONTENT_TYPE: &str = "Content-Type";

/// How an [`AttributeSet`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    /// `Key=Value,Key=Value`, for `object put --attributes`.
    Assign,
    /// `Key EQ Value,Key EQ Value`, for `object search --filters`.
    Filter,
    /// The mapping itself; see [`AttributeSet::iter`].
    Map,
}

/// Ordered attribute mapping. Re-inserting a key replaces its value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pairs: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path first, content type second, then the user pairs in the order given.
    pub fn compile(
        path: &str,
        content_type: Option<&str>,
        extra: Option<&str>,
    ) -> Result<Self, PublishError> {
        let mut attrs = AttributeSet::new();
        attrs.insert(FILE_PATH, path);
        if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
            attrs.insert(CONTENT_TYPE, ct);
        }
        for (key, value) in parse_extra(extra)? {
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    /// Search filter selecting objects previously published at `path`. Content type never
    /// takes part, even when the user attributes set one.
    pub fn search_filter(path: &str, extra: Option<&str>) -> Result<String, PublishError> {
        let mut attrs = Self::compile(path, None, extra)?;
        attrs.remove(CONTENT_TYPE);
        Ok(attrs.render(AttributeFormat::Filter))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as a comma separated string. `Map` renders like `Assign`.
    pub fn render(&self, format: AttributeFormat) -> String {
        let sep = match format {
            AttributeFormat::Filter => " EQ ",
            AttributeFormat::Assign | AttributeFormat::Map => "=",
        };
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}{sep}{v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse `Key1=Value1,Key2=Value2`. Every token needs exactly one `=`.
pub fn parse_extra(extra: Option<&str>) -> Result<Vec<(String, String)>, PublishError> {
    let csv = match extra {
        Some(csv) if !csv.trim().is_empty() => csv,
        _ => return Ok(Vec::new()),
    };
    csv.split(',')
        .map(|token| {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) if !key.is_empty() => {
                    Ok((key.to_owned(), value.to_owned()))
                }
                _ => Err(PublishError::invalid_input(format!(
                    "attribute {token:?} must have the form Key=Value"
                ))),
            }
        })
        .collect()
}
