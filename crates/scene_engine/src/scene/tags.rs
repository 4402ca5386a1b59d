//! Per-entity tag set

/// Unordered labels attached to an entity
///
/// Behaves like a set for lookups but keeps duplicates: adding a tag twice
/// stores it twice, and [`TagSet::remove`] drops a single occurrence. Removal
/// swaps the match with the last tag, so order is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Create an empty tag set
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Append a tag
    pub fn add(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Append several tags
    pub fn add_all<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
    }

    /// Remove the first occurrence of `tag`
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if a tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of occurrences of `tag`
    pub fn count(&self, tag: &str) -> usize {
        self.tags.iter().filter(|t| *t == tag).count()
    }

    /// Iterate over the tags in storage order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Tags in storage order
    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    /// Number of stored tags, duplicates included
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tags are stored
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}
