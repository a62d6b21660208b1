//! Configured language tags.
//!
//! # Responsibilities
//! - Hold one configured language tag as raw bytes
//! - Keep the ordered tag list of a configuration scope
//! - Merge a child scope's list with its parent's
//!
//! # Design Decisions
//! - Tags are stored exactly as configured; case folding happens only at
//!   comparison time and only for ASCII bytes
//! - Duplicates are kept, order is insertion order
//! - Inheritance is all-or-nothing: a child with any tag of its own never
//!   sees the parent's tags

use std::collections::TryReserveError;
use std::fmt;

use bytes::Bytes;

/// Errors raised while building a tag list.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("empty language tag")]
    Empty,

    #[error("cannot grow language tag list: {0}")]
    Alloc(#[from] TryReserveError),
}

/// A configured language tag such as `en` or `en-GB`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(Bytes);

impl LanguageTag {
    /// Create a tag from its bytes. Empty input is rejected.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, TagError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TagError::Empty);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Shared handle to the tag bytes.
    pub fn bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this tag is an ASCII case-insensitive prefix of `range`.
    ///
    /// A tag longer than the range never matches, so `en` matches `en-US`
    /// but `en-US` does not match `en`.
    pub fn is_prefix_of(&self, range: &[u8]) -> bool {
        range.len() >= self.0.len() && range[..self.0.len()].eq_ignore_ascii_case(&self.0)
    }
}

impl fmt::Debug for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageTag({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Ordered list of language tags owned by one configuration scope.
///
/// Index 0 is the default tag used when negotiation finds no match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<LanguageTag>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag at the end of the list.
    pub fn add(&mut self, tag: LanguageTag) -> Result<(), TagError> {
        self.tags.try_reserve(1)?;
        self.tags.push(tag);
        Ok(())
    }

    /// Resolve a child scope's list against its parent's.
    ///
    /// An empty child receives its own copy of the parent's tags; a
    /// non-empty child is returned unchanged.
    pub fn merge(parent: &TagList, child: TagList) -> Result<TagList, TagError> {
        if !child.is_empty() {
            return Ok(child);
        }

        let mut merged = TagList::new();
        merged.tags.try_reserve_exact(parent.len())?;
        merged.tags.extend(parent.tags.iter().cloned());
        Ok(merged)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn get(&self, index: usize) -> Option<&LanguageTag> {
        self.tags.get(index)
    }

    /// The fallback tag, if the list is not empty.
    pub fn default_tag(&self) -> Option<&LanguageTag> {
        self.tags.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LanguageTag> {
        self.tags.iter()
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a LanguageTag;
    type IntoIter = std::slice::Iter<'a, LanguageTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tags: &[&'static str]) -> TagList {
        let mut list = TagList::new();
        for tag in tags {
            list.add(LanguageTag::new(*tag).unwrap()).unwrap();
        }
        list
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert!(matches!(LanguageTag::new(""), Err(TagError::Empty)));
    }

    #[test]
    fn test_prefix_match() {
        let en = LanguageTag::new("en").unwrap();
        assert!(en.is_prefix_of(b"en"));
        assert!(en.is_prefix_of(b"en-GB"));
        assert!(en.is_prefix_of(b"EN-us"));
        assert!(!en.is_prefix_of(b"e"));
        assert!(!en.is_prefix_of(b""));
        assert!(!en.is_prefix_of(b"fr-en"));

        let en_gb = LanguageTag::new("en-GB").unwrap();
        assert!(!en_gb.is_prefix_of(b"en"));
        assert!(en_gb.is_prefix_of(b"en-gb"));
    }

    #[test]
    fn test_list_keeps_order_and_duplicates() {
        let tags = list(&["fr", "en", "fr"]);
        let collected: Vec<_> = tags.iter().map(|t| t.to_string()).collect();
        assert_eq!(collected, vec!["fr", "en", "fr"]);
        assert_eq!(tags.default_tag().unwrap().as_bytes(), b"fr");
    }

    #[test]
    fn test_merge_inherits_copy_when_child_empty() {
        let parent = list(&["en", "fr"]);
        let mut merged = TagList::merge(&parent, TagList::new()).unwrap();
        assert_eq!(merged, parent);

        // The inherited list is a copy; growing it leaves the parent alone.
        merged.add(LanguageTag::new("de").unwrap()).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(parent.len(), 2);
    }

    #[test]
    fn test_merge_child_overrides() {
        let parent = list(&["en", "fr"]);
        let child = list(&["de"]);
        let merged = TagList::merge(&parent, child.clone()).unwrap();
        assert_eq!(merged, child);
    }

    #[test]
    fn test_merge_both_empty() {
        let merged = TagList::merge(&TagList::new(), TagList::new()).unwrap();
        assert!(merged.is_empty());
        assert!(merged.default_tag().is_none());
    }
}
