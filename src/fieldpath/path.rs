//! Path element and path types.

use std::fmt;

use crate::diff::ConfigError;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Field name for record fields.
    FieldName(String),
    /// Rendered key of a keyed-mapping entry. Keys that are empty or
    /// contain `.`, `[` or `]` render quoted as `["key"]`.
    Key(String),
    /// Original index of a sequence element.
    Index(usize),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new map key path element.
    pub fn key(key: impl Into<String>) -> Self {
        PathElement::Key(key.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathElement::Index(_))
    }

    /// Returns true if the element renders inside brackets.
    fn is_bracketed(&self) -> bool {
        match self {
            PathElement::Index(_) => true,
            PathElement::Key(key) => needs_quotes(key),
            PathElement::FieldName(_) => false,
        }
    }

    /// Returns the field name if this is a field name element.
    pub fn as_field_name(&self) -> Option<&str> {
        match self {
            PathElement::FieldName(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Key(key) if needs_quotes(key) => write!(f, "[\"{}\"]", key),
            PathElement::FieldName(name) | PathElement::Key(name) => write!(f, ".{}", name),
            PathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty() || key.contains(|c: char| c == '.' || c == '[' || c == ']')
}

/// Path is the location of a value inside the compared graph.
///
/// Paths are never changed in place: [`Path::with`] returns an extended copy.
/// The root renders as `.`, fields and keys as `.name` and indices as `[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates the root path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Parses an absolute path such as `.Spec.Items[2].Name`.
    ///
    /// Plain steps parse as field names; map keys render identically, so
    /// the parsed path matches both. Quoted steps (`["a.b"]`) parse as keys.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut rest = text
            .strip_prefix('.')
            .ok_or_else(|| ConfigError::invalid_path(text, "must start with '.'"))?;
        let mut elements = Vec::new();
        if rest.is_empty() {
            return Ok(Path::new());
        }
        let mut expect_name = !rest.starts_with('[');
        loop {
            if expect_name {
                let end = rest.find(|c: char| c == '.' || c == '[').unwrap_or(rest.len());
                if end == 0 {
                    return Err(ConfigError::invalid_path(text, "empty step"));
                }
                elements.push(PathElement::field_name(&rest[..end]));
                rest = &rest[end..];
            }
            while let Some(inner) = rest.strip_prefix('[') {
                if let Some(quoted) = inner.strip_prefix('"') {
                    let close = quoted
                        .find("\"]")
                        .ok_or_else(|| ConfigError::invalid_path(text, "unterminated key"))?;
                    elements.push(PathElement::key(&quoted[..close]));
                    rest = &quoted[close + 2..];
                } else {
                    let close = inner
                        .find(']')
                        .ok_or_else(|| ConfigError::invalid_path(text, "unterminated index"))?;
                    let index = inner[..close]
                        .parse::<usize>()
                        .map_err(|_| ConfigError::invalid_path(text, "index must be a number"))?;
                    elements.push(PathElement::index(index));
                    rest = &inner[close + 1..];
                }
            }
            if rest.is_empty() {
                break;
            }
            rest = rest
                .strip_prefix('.')
                .ok_or_else(|| ConfigError::invalid_path(text, "unexpected text after index"))?;
            expect_name = true;
        }
        Ok(Path { elements })
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true for the root path.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the path elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Returns the last path element.
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend_from_slice(&self.elements);
        elements.push(element);
        Path { elements }
    }

    /// Returns a slice of the path elements.
    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }

    /// Renders the path with every index replaced by `[*]`.
    pub fn wildcard(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, true);
        out
    }

    /// Returns the rendered text after the last `.`, e.g. `Name` for
    /// `.Spec.Name` and `Tags[1]` for `.Tags[1]`.
    pub fn last_segment(&self) -> String {
        use std::fmt::Write;

        let start = self
            .elements
            .iter()
            .rposition(|e| !e.is_bracketed())
            .unwrap_or(0);
        let mut out = String::new();
        for element in &self.elements[start..] {
            let _ = write!(out, "{}", element);
        }
        if out.starts_with('.') {
            out.remove(0);
        }
        out
    }

    fn render(&self, out: &mut String, wildcard: bool) {
        use std::fmt::Write;

        if self.elements.first().map_or(true, PathElement::is_bracketed) {
            out.push('.');
        }
        for element in &self.elements {
            match element {
                PathElement::Index(_) if wildcard => out.push_str("[*]"),
                other => {
                    let _ = write!(out, "{}", other);
                }
            }
        }
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, false);
        f.write_str(&out)
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}
