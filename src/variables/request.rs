//! Per-request variable cache.

use bytes::Bytes;

use crate::variables::registry::{RequestView, VariableIndex, VariableRegistry, VariableValue};

/// Lazily evaluated variables of one request.
///
/// A value is computed on its first read. Cacheable values are reused for
/// the rest of the request; `no_cacheable` values are recomputed each time.
#[derive(Debug)]
pub struct RequestVariables<'r> {
    registry: &'r VariableRegistry,
    view: RequestView<'r>,
    cache: Vec<Option<VariableValue>>,
}

impl<'r> RequestVariables<'r> {
    pub fn new(registry: &'r VariableRegistry, view: RequestView<'r>) -> Self {
        Self {
            registry,
            view,
            cache: vec![None; registry.len()],
        }
    }

    pub fn get(&mut self, index: VariableIndex) -> VariableValue {
        if let Some(Some(cached)) = self.cache.get(index) {
            if !cached.no_cacheable {
                return cached.clone();
            }
        }

        let value = self.registry.evaluate(index, &self.view);
        if let Some(slot) = self.cache.get_mut(index) {
            *slot = Some(value.clone());
        }
        value
    }

    /// Read a variable by name; `None` if no such variable is registered.
    pub fn get_by_name(&mut self, name: &str) -> Option<VariableValue> {
        let index = self.registry.lookup(name)?;
        Some(self.get(index))
    }

    /// Bytes a variable renders as; not-found values render empty.
    pub fn render(&mut self, name: &str) -> Bytes {
        match self.get_by_name(name) {
            Some(value) if !value.not_found => value.data,
            _ => Bytes::new(),
        }
    }
}
