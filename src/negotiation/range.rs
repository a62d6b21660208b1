//! Accept-Language range scanning.
//!
//! Splits a raw header value into language ranges, one at a time, in the
//! order the client listed them. Quality suffixes (`;q=0.8`) are skipped
//! over and never evaluated.

use std::fmt;
use std::iter::FusedIterator;

/// One client-supplied language range, borrowed from the header value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LanguageRange<'a>(&'a [u8]);

impl<'a> LanguageRange<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for LanguageRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageRange({:?})", String::from_utf8_lossy(self.0))
    }
}

/// Iterator over the ranges of an `Accept-Language` value.
///
/// Only ASCII space is skipped before a range. A range ends at `,`, `;` or
/// the end of input and may be empty.
#[derive(Debug, Clone)]
pub struct LanguageRanges<'a> {
    input: &'a [u8],
    cursor: usize,
}

impl<'a> LanguageRanges<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, cursor: 0 }
    }
}

impl<'a> Iterator for LanguageRanges<'a> {
    type Item = LanguageRange<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        let end = input.len();
        if self.cursor >= end {
            return None;
        }

        let mut start = self.cursor;
        while start < end && input[start] == b' ' {
            start += 1;
        }

        let mut pos = start;
        while pos < end && input[pos] != b',' && input[pos] != b';' {
            pos += 1;
        }
        let range = LanguageRange(&input[start..pos]);

        if pos < end && input[pos] == b';' {
            while pos < end && input[pos] != b',' {
                pos += 1;
            }
        }
        if pos < end && input[pos] == b',' {
            pos += 1;
        }

        self.cursor = pos;
        Some(range)
    }
}

impl FusedIterator for LanguageRanges<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(input: &str) -> Vec<&str> {
        LanguageRanges::new(input.as_bytes())
            .map(|r| std::str::from_utf8(r.as_bytes()).unwrap())
            .collect()
    }

    #[test]
    fn test_simple_list() {
        assert_eq!(ranges("en-US,fr;q=0.5"), vec!["en-US", "fr"]);
        assert_eq!(ranges("da, en-gb;q=0.8, en;q=0.7"), vec!["da", "en-gb", "en"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ranges("").is_empty());
    }

    #[test]
    fn test_empty_ranges() {
        assert_eq!(ranges(",en"), vec!["", "en"]);
        assert_eq!(ranges("en,,fr"), vec!["en", "", "fr"]);
        assert_eq!(ranges(";q=0.9,en"), vec!["", "en"]);
    }

    #[test]
    fn test_trailing_delimiters() {
        assert_eq!(ranges("en,"), vec!["en"]);
        assert_eq!(ranges("en;q=1"), vec!["en"]);
        assert_eq!(ranges("en, "), vec!["en", ""]);
    }

    #[test]
    fn test_only_space_is_skipped() {
        assert_eq!(ranges("  en"), vec!["en"]);
        assert_eq!(ranges("\ten"), vec!["\ten"]);
        // Spaces before a delimiter stay part of the range.
        assert_eq!(ranges("en ,fr"), vec!["en ", "fr"]);
    }

    #[test]
    fn test_quality_suffix_without_comma() {
        assert_eq!(ranges("en;q=0.5;level=1"), vec!["en"]);
        assert_eq!(ranges("en;q=0.5;x,fr"), vec!["en", "fr"]);
    }
}
