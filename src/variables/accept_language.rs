//! Provider for variables bound by `set_from_accept_language`.

use axum::http::{header, HeaderMap, HeaderName};

use crate::negotiation::{negotiate, Negotiation};
use crate::observability::metrics;
use crate::variables::registry::{RequestView, VariableProvider, VariableValue};

/// Raw value of the first header named `name`, or `None` if absent.
pub fn header_bytes<'h>(headers: &'h HeaderMap, name: &HeaderName) -> Option<&'h [u8]> {
    headers.get(name).map(|value| value.as_bytes())
}

/// Negotiates the request's `Accept-Language` against the scope's tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptLanguageVariable;

impl VariableProvider for AcceptLanguageVariable {
    fn evaluate(&self, request: &RequestView<'_>) -> VariableValue {
        let tags = request.scope.accept_language();
        let header = header_bytes(request.headers, &header::ACCEPT_LANGUAGE);
        let negotiation = negotiate(header, tags);

        tracing::debug!(
            scope = %request.scope.name(),
            outcome = negotiation.label(),
            tag = ?negotiation.tag(),
            "Negotiated content language"
        );
        metrics::record_negotiation(negotiation.label());

        negotiation.into()
    }
}

impl From<Negotiation<'_>> for VariableValue {
    fn from(negotiation: Negotiation<'_>) -> Self {
        match negotiation {
            Negotiation::NotFound => VariableValue::not_found(),
            Negotiation::Selected { tag, .. } => VariableValue::found(tag.bytes()),
        }
    }
}
