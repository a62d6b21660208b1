//! Directive table.
//!
//! # Responsibilities
//! - Map directive names to the setters that apply them to a scope
//! - Check argument counts before a setter runs
//! - Register variables named by directives
//!
//! # Design Decisions
//! - Each directive writes named fields of `ScopeDirectives`; nothing is
//!   addressed by offset
//! - Setters run in declaration order, so later directives in a scope
//!   append to what earlier ones built
//! - A variable name without `$` is a warning, not an error

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderName, StatusCode};
use bytes::Bytes;

use crate::config::scope::{AddHeader, Respond, ScopeDirectives};
use crate::negotiation::{LanguageTag, TagError};
use crate::variables::{AcceptLanguageVariable, Template, TemplateError, VariableError, VariableRegistry};

/// Errors raised while applying one directive.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("empty directive")]
    Empty,

    #[error("unknown directive \"{0}\"")]
    Unknown(String),

    #[error("invalid number of arguments in \"{directive}\" directive: {arity}, got {got}")]
    Arity {
        directive: &'static str,
        arity: Arity,
        got: usize,
    },

    #[error("\"{0}\" directive is duplicate")]
    Duplicate(&'static str),

    #[error("invalid header name \"{0}\"")]
    HeaderName(String),

    #[error("invalid return code \"{0}\"")]
    Status(String),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Variable(#[from] VariableError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Number of arguments a directive accepts, not counting its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exactly(k) => n == k,
            Arity::Between(lo, hi) => (lo..=hi).contains(&n),
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "expected {}", k),
            Arity::Between(lo, hi) => write!(f, "expected {} to {}", lo, hi),
            Arity::AtLeast(k) => write!(f, "expected at least {}", k),
        }
    }
}

/// State shared by all directives of one configuration load.
#[derive(Debug)]
pub struct DirectiveContext<'a> {
    pub variables: &'a mut VariableRegistry,
    /// Name of the scope being built, for log messages.
    pub scope: &'a str,
}

type Setter = fn(&mut DirectiveContext<'_>, &mut ScopeDirectives, &[String]) -> Result<(), DirectiveError>;

/// One entry of the directive table.
pub struct Directive {
    pub name: &'static str,
    pub arity: Arity,
    set: Setter,
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directive")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// All directives understood in a scope.
pub static DIRECTIVES: &[Directive] = &[
    Directive {
        name: "set_from_accept_language",
        arity: Arity::AtLeast(1),
        set: set_from_accept_language,
    },
    Directive {
        name: "add_header",
        arity: Arity::Exactly(2),
        set: add_header,
    },
    Directive {
        name: "return",
        arity: Arity::Between(1, 2),
        set: set_return,
    },
];

pub fn find(name: &str) -> Option<&'static Directive> {
    DIRECTIVES.iter().find(|d| d.name == name)
}

/// Apply one `[name, args...]` entry to `conf`.
pub fn apply(
    ctx: &mut DirectiveContext<'_>,
    conf: &mut ScopeDirectives,
    entry: &[String],
) -> Result<(), DirectiveError> {
    let (name, args) = entry.split_first().ok_or(DirectiveError::Empty)?;
    let directive = find(name).ok_or_else(|| DirectiveError::Unknown(name.clone()))?;

    if !directive.arity.accepts(args.len()) {
        return Err(DirectiveError::Arity {
            directive: directive.name,
            arity: directive.arity,
            got: args.len(),
        });
    }

    (directive.set)(ctx, conf, args)
}

/// `set_from_accept_language $var tag...`
fn set_from_accept_language(
    ctx: &mut DirectiveContext<'_>,
    conf: &mut ScopeDirectives,
    args: &[String],
) -> Result<(), DirectiveError> {
    let raw = args[0].as_str();
    let name = match raw.strip_prefix('$') {
        Some(name) => name,
        None => {
            tracing::warn!(
                scope = ctx.scope,
                variable = raw,
                "\"{}\" variable name should start with '$'",
                raw
            );
            raw
        }
    };

    let variable = ctx.variables.add(name)?;
    if variable.set_provider_if_absent(Arc::new(AcceptLanguageVariable)) {
        tracing::debug!(scope = ctx.scope, variable = name, "Registered accept-language variable");
    }

    for tag in &args[1..] {
        conf.accept_language
            .add(LanguageTag::new(Bytes::from(tag.clone()))?)?;
    }
    Ok(())
}

/// `add_header NAME VALUE`
fn add_header(
    _ctx: &mut DirectiveContext<'_>,
    conf: &mut ScopeDirectives,
    args: &[String],
) -> Result<(), DirectiveError> {
    let name = HeaderName::from_bytes(args[0].as_bytes())
        .map_err(|_| DirectiveError::HeaderName(args[0].clone()))?;
    let value = Template::parse(&args[1])?;
    conf.add_headers.push(AddHeader { name, value });
    Ok(())
}

/// `return CODE [TEXT]`
fn set_return(
    _ctx: &mut DirectiveContext<'_>,
    conf: &mut ScopeDirectives,
    args: &[String],
) -> Result<(), DirectiveError> {
    if conf.respond.is_some() {
        return Err(DirectiveError::Duplicate("return"));
    }

    let status = args[0]
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=599).contains(code))
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| DirectiveError::Status(args[0].clone()))?;
    let text = args.get(1).map(|text| Template::parse(text)).transpose()?;

    conf.respond = Some(Respond { status, text });
    Ok(())
}
