//! Response assembly.
//!
//! # Responsibilities
//! - Answer with the scope's `return`, or 404 without one
//! - Add the scope's `add_header` headers
//!
//! # Design Decisions
//! - Redirect codes put the rendered text in `Location`, other codes use
//!   it as the body
//! - Headers that render empty are omitted
//! - A rendered value that is not a valid header value is logged and
//!   dropped; the request still succeeds

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::scope::{Respond, Scope};
use crate::variables::RequestVariables;

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Build the response for a request resolved to `scope`.
pub fn respond(scope: &Scope, vars: &mut RequestVariables<'_>) -> Response {
    let mut response = match scope.respond() {
        Some(respond) => render_return(respond, vars),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    };

    for add in scope.add_headers() {
        let value = add.value.render(vars);
        if value.is_empty() {
            continue;
        }
        match HeaderValue::from_maybe_shared(value) {
            Ok(value) => {
                response.headers_mut().append(add.name.clone(), value);
            }
            Err(_) => {
                tracing::warn!(
                    scope = scope.name(),
                    header = %add.name,
                    "Rendered header value is invalid, skipping"
                );
            }
        }
    }

    response
}

fn render_return(respond: &Respond, vars: &mut RequestVariables<'_>) -> Response {
    let text = respond
        .text
        .as_ref()
        .map(|t| t.render(vars))
        .unwrap_or_default();

    if is_redirect(respond.status) {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = respond.status;
        if !text.is_empty() {
            match HeaderValue::from_maybe_shared(text) {
                Ok(location) => {
                    response.headers_mut().insert(header::LOCATION, location);
                }
                Err(_) => tracing::warn!("Rendered redirect location is invalid"),
            }
        }
        return response;
    }

    let has_body = !text.is_empty();
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = respond.status;
    if has_body {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ScopeConfig;
    use crate::variables::{RequestView, VariableRegistry};
    use axum::http::HeaderMap;

    fn compile(directives: &[&[&str]]) -> (Scope, VariableRegistry) {
        let config = ScopeConfig {
            directives: directives
                .iter()
                .map(|d| d.iter().map(|s| s.to_string()).collect::<Vec<_>>())
                .collect(),
            ..Default::default()
        };
        let mut variables = VariableRegistry::new();
        let scope = Scope::compile(&config, &mut variables).unwrap();
        (scope, variables)
    }

    fn run(directives: &[&[&str]], accept_language: Option<&'static str>) -> Response {
        let (scope, variables) = compile(directives);
        let mut headers = HeaderMap::new();
        if let Some(value) = accept_language {
            headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(value));
        }
        let mut vars = RequestVariables::new(
            &variables,
            RequestView {
                headers: &headers,
                scope: &scope,
            },
        );
        respond(&scope, &mut vars)
    }

    #[test]
    fn test_no_return_is_404() {
        let response = run(&[], None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_redirect_uses_location() {
        let response = run(
            &[
                &["set_from_accept_language", "$lang", "en", "fr"],
                &["return", "302", "/$lang/"],
            ],
            Some("fr-FR"),
        );
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/fr/");
    }

    #[test]
    fn test_add_header_with_negotiated_value() {
        let response = run(
            &[
                &["set_from_accept_language", "$lang", "en", "fr"],
                &["add_header", "Content-Language", "$lang"],
                &["return", "200", "hello"],
            ],
            Some("de, fr;q=0.3"),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "fr");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_not_found_variable_omits_header() {
        let response = run(
            &[
                &["set_from_accept_language", "$lang"],
                &["add_header", "Content-Language", "$lang"],
                &["return", "204"],
            ],
            Some("en"),
        );
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_LANGUAGE).is_none());
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
