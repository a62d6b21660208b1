//! String templates that read variables.
//!
//! `$name` and `${name}` are replaced by the variable's value; names are
//! made of ASCII letters, digits and `_`. A `$` that does not start a name
//! is kept as a literal.

use bytes::{Bytes, BytesMut};

use crate::variables::request::RequestVariables;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated \"${{\" in \"{0}\"")]
    Unterminated(String),

    #[error("invalid variable name \"{name}\" in \"{source_text}\"")]
    InvalidName { name: String, source_text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(dollar) = rest.find('$') {
            literal.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            if let Some(braced) = after.strip_prefix('{') {
                let close = braced
                    .find('}')
                    .ok_or_else(|| TemplateError::Unterminated(source.to_string()))?;
                let name = &braced[..close];
                if name.is_empty() || !name.bytes().all(is_name_byte) {
                    return Err(TemplateError::InvalidName {
                        name: name.to_string(),
                        source_text: source.to_string(),
                    });
                }
                flush(&mut literal, &mut segments);
                segments.push(Segment::Variable(name.to_ascii_lowercase()));
                rest = &braced[close + 1..];
                continue;
            }

            let len = after.bytes().take_while(|b| is_name_byte(*b)).count();
            if len == 0 {
                literal.push('$');
            } else {
                flush(&mut literal, &mut segments);
                segments.push(Segment::Variable(after[..len].to_ascii_lowercase()));
            }
            rest = &after[len..];
        }
        literal.push_str(rest);
        flush(&mut literal, &mut segments);

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the variables this template reads, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, vars: &mut RequestVariables<'_>) -> Bytes {
        let mut out = BytesMut::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.extend_from_slice(text.as_bytes()),
                Segment::Variable(name) => out.extend_from_slice(&vars.render(name)),
            }
        }
        out.freeze()
    }
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let t = Template::parse("hello").unwrap();
        assert_eq!(t.variables().count(), 0);
        assert_eq!(t.segments, vec![Segment::Literal("hello".into())]);
    }

    #[test]
    fn test_variables() {
        let t = Template::parse("/docs/$lang/index-${Lang}.html").unwrap();
        assert_eq!(t.variables().collect::<Vec<_>>(), vec!["lang", "lang"]);
        assert_eq!(
            t.segments,
            vec![
                Segment::Literal("/docs/".into()),
                Segment::Variable("lang".into()),
                Segment::Literal("/index-".into()),
                Segment::Variable("lang".into()),
                Segment::Literal(".html".into()),
            ]
        );
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let t = Template::parse("cost: $ 5$").unwrap();
        assert_eq!(t.segments, vec![Segment::Literal("cost: $ 5$".into())]);
    }

    #[test]
    fn test_braced_errors() {
        assert_eq!(
            Template::parse("${lang").unwrap_err(),
            TemplateError::Unterminated("${lang".into())
        );
        assert!(matches!(
            Template::parse("${}").unwrap_err(),
            TemplateError::InvalidName { .. }
        ));
        assert!(matches!(
            Template::parse("${a-b}").unwrap_err(),
            TemplateError::InvalidName { .. }
        ));
    }
}
