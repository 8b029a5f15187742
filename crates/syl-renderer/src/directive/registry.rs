//! Directive name to handler mapping.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Directive, DirectiveSpec};

/// Immutable set of directive handlers, keyed by name.
///
/// Built once at startup and shared between renders.
///
/// # Example
///
/// ```
/// use syl_renderer::directive::{
///     ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput,
///     DirectiveRegistry, DirectiveSpec, Invocation,
/// };
///
/// struct Rule;
///
/// impl Directive for Rule {
///     fn spec(&self) -> DirectiveSpec {
///         DirectiveSpec::new(0, 0, ContentRule::Forbidden)
///     }
///
///     fn run(
///         &self,
///         _invocation: &Invocation,
///         _ctx: &DirectiveContext<'_>,
///     ) -> Result<DirectiveOutput, DirectiveError> {
///         Ok(DirectiveOutput::html("<hr>"))
///     }
/// }
///
/// let registry = DirectiveRegistry::builder().register("rule", Rule).build();
/// assert!(registry.get("rule").is_some());
/// assert!(registry.get("missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    handlers: HashMap<String, Registered>,
}

#[derive(Clone)]
struct Registered {
    handler: Arc<dyn Directive>,
    spec: DirectiveSpec,
}

impl DirectiveRegistry {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> DirectiveRegistryBuilder {
        DirectiveRegistryBuilder::default()
    }

    /// Handler registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Directive> {
        self.handlers.get(name).map(|r| r.handler.as_ref())
    }

    /// Spec of the handler registered under `name`.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&DirectiveSpec> {
        self.handlers.get(name).map(|r| &r.spec)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Builder for [`DirectiveRegistry`].
#[derive(Default)]
pub struct DirectiveRegistryBuilder {
    handlers: HashMap<String, Registered>,
}

impl DirectiveRegistryBuilder {
    /// Register `handler` under `name`, replacing any previous handler.
    #[must_use]
    pub fn register(self, name: impl Into<String>, handler: impl Directive + 'static) -> Self {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register a shared handler under `name`.
    ///
    /// Lets one handler serve several names.
    #[must_use]
    pub fn register_shared(mut self, name: impl Into<String>, handler: Arc<dyn Directive>) -> Self {
        let name = name.into();
        let spec = handler.spec();
        if self
            .handlers
            .insert(name.clone(), Registered { handler, spec })
            .is_some()
        {
            tracing::debug!(directive = %name, "Replaced directive handler");
        }
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> DirectiveRegistry {
        DirectiveRegistry {
            handlers: self.handlers,
        }
    }
}
