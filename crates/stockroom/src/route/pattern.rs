use super::{Method, normalize};
use crate::error::{StockError, StockResult};
use std::str::FromStr;

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str, pattern: &str) -> StockResult<Self> {
        if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if name.is_empty() || name.contains(['{', '}']) {
                return Err(StockError::InvalidRoute(format!(
                    "bad parameter segment '{raw}' in '{pattern}'"
                )));
            }
            return Ok(Segment::Param(name.to_string()));
        }
        if raw.contains(['{', '}']) {
            return Err(StockError::InvalidRoute(format!(
                "stray brace in segment '{raw}' of '{pattern}'"
            )));
        }
        Ok(Segment::Literal(raw.to_string()))
    }

    /// Whether some concrete segment could match both.
    fn compatible(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            // A param never captures an empty segment.
            (Segment::Literal(lit), Segment::Param(_))
            | (Segment::Param(_), Segment::Literal(lit)) => !lit.is_empty(),
            (Segment::Param(_), Segment::Param(_)) => true,
        }
    }
}

/// A method plus a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    method: Method,
    path: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(method: Method, path: &str) -> StockResult<Self> {
        let path = normalize(path).to_string();
        let segments = path
            .split('/')
            .map(|raw| Segment::parse(raw, &path))
            .collect::<StockResult<Vec<_>>>()?;

        let mut names: Vec<&str> = Vec::new();
        for seg in &segments {
            if let Segment::Param(name) = seg {
                if names.contains(&name.as_str()) {
                    return Err(StockError::InvalidRoute(format!(
                        "duplicate parameter '{name}' in '{path}'"
                    )));
                }
                names.push(name);
            }
        }

        Ok(Self {
            method,
            path,
            segments,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path template without the leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Table key: `"METHOD path"`.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// True when no segment is a parameter.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Structural match against an already split request path.
    pub(crate) fn capture(&self, method: Method, parts: &[&str]) -> Option<PathParams> {
        if method != self.method || parts.len() != self.segments.len() {
            return None;
        }
        let mut params = PathParams::default();
        for (seg, part) in self.segments.iter().zip(parts) {
            match seg {
                Segment::Literal(lit) if lit == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.0.push((name.clone(), (*part).to_string()));
                }
                _ => return None,
            }
        }
        Some(params)
    }

    /// Whether some request could match both patterns.
    pub(crate) fn overlaps(&self, other: &RoutePattern) -> bool {
        self.method == other.method
            && self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.compatible(b))
    }
}

/// Values bound to `{name}` segments, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse the named parameter; `None` when missing or unparsable.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
