//! Taxonomies and their category definitions.
//!
//! A definition block is a sequence of entries shaped as
//! `[Name] marker: free-text description`, separated by commas and/or newlines. A comma or
//! newline only ends an entry when the next non-whitespace character opens the next `[Name]`,
//! so descriptions may themselves contain commas.

use serde::Serialize;

/// One of the two independent classification dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Taxonomy {
    Problem,
    Solution,
}

impl Taxonomy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Problem => "problem",
            Taxonomy::Solution => "solution",
        }
    }

    /// Column name this taxonomy's labels occupy in the result table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Taxonomy::Problem => "problem category",
            Taxonomy::Solution => "solution category",
        }
    }
}

impl std::fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named bucket with a descriptive definition. The name is the exact string the model is asked
/// to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryDefinitionError {
    #[error("InvalidCategoryDefinition: {0}")]
    InvalidCategoryDefinition(String),
}

/// An ordered, non-empty set of categories scoped to one taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    pub taxonomy: Taxonomy,
    categories: Vec<Category>,
}

impl CategorySet {
    /// Parse a raw definition block. Fails on a malformed block or when zero categories parse.
    pub fn parse(taxonomy: Taxonomy, raw: &str) -> Result<Self, CategoryDefinitionError> {
        let mut categories: Vec<Category> = Vec::new();
        let mut rest = raw.trim_start_matches(|c: char| c.is_whitespace() || c == ',');

        while !rest.is_empty() {
            if !rest.starts_with('[') {
                return Err(CategoryDefinitionError::InvalidCategoryDefinition(format!(
                    "expected '[' at start of a category entry, found: {:?}",
                    rest.chars().take(20).collect::<String>()
                )));
            }
            let close = rest.find(']').ok_or_else(|| {
                CategoryDefinitionError::InvalidCategoryDefinition(
                    "unclosed '[' in category entry".to_string(),
                )
            })?;
            let name = rest[1..close].trim().to_string();
            if name.is_empty() {
                return Err(CategoryDefinitionError::InvalidCategoryDefinition(
                    "category entry has an empty name".to_string(),
                ));
            }
            rest = &rest[close + 1..];

            let (body, remainder) = split_at_entry_delimiter(rest);
            let description = strip_description_marker(body).trim().to_string();
            categories.push(Category { name, description });

            rest = remainder.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        }

        if categories.is_empty() {
            return Err(CategoryDefinitionError::InvalidCategoryDefinition(
                "definition block contains no categories".to_string(),
            ));
        }
        Ok(Self {
            taxonomy,
            categories,
        })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Render the set for prompt embedding, one `[Name] description` line per category, in
    /// definition order.
    pub fn render(&self) -> String {
        self.categories
            .iter()
            .map(|c| format!("[{}] {}", c.name, c.description))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Split an entry body from the rest of the block. The body ends at the first comma or newline
/// whose next non-whitespace character (skipping further separators) is `[`, or at end of input.
fn split_at_entry_delimiter(text: &str) -> (&str, &str) {
    for (idx, c) in text.char_indices() {
        if c != ',' && c != '\n' {
            continue;
        }
        let after = &text[idx + 1..];
        let next = after.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if next.starts_with('[') || next.is_empty() {
            return (&text[..idx], after);
        }
    }
    (text, "")
}

/// Drop the `marker:` prefix of an entry body, when present. The marker is whatever precedes the
/// first colon; a body with no colon is taken whole.
fn strip_description_marker(body: &str) -> &str {
    match body.find(':') {
        Some(idx) => &body[idx + 1..],
        None => body,
    }
}
