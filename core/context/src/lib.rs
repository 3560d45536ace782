//! The [`Context`] is a general purpose immutable container to carry request scoped values around.
//!
//! Contexts are organised into a tree structure:
//!
//! - A root context represents the general process wide scope.
//! - Derived contexts represents a narrower scope within their parent with additional
//!   or updated information attached to them.
//!
//! The transport layer derives a context for each request and attaches the [`IdentityClaim`]
//! it extracted from the session, if any.
//! Authorization reads the claim from the context and never from anywhere else.
use opentelemetry_api::trace::TraceContextExt;
use opentelemetry_api::trace::TraceId;
use opentelemetry_api::Context as OtelContext;
use slog::Logger;
use slog::OwnedKV;
use slog::SendSyncRefUnwindSafeKV;

use warden_models::IdentityClaim;

/// The [`Context`] is a general purpose container to carry scoped values around.
///
/// Refer to the [crate level docs](crate) for details.
#[derive(Clone, Debug)]
pub struct Context {
    /// Identity asserted for the current request.
    ///
    /// The value of `None` indicates no identity was attached by the transport layer.
    pub claim: Option<IdentityClaim>,

    /// Logger with contextual attributes attached to it.
    pub logger: Logger,
}

impl Context {
    /// Derive a new [`Context`] by making changes to the current one.
    pub fn derive(&self) -> ContextBuilder {
        ContextBuilder {
            claim: self.claim.clone(),
            logger: self.logger.clone(),
        }
    }

    /// Derive a new [`Context`] by making changes to the current one using the provided callback.
    pub fn derive_with<F>(&self, callback: F) -> Context
    where
        F: FnOnce(ContextBuilder) -> ContextBuilder,
    {
        let builder = callback(self.derive());
        builder.build()
    }

    /// Initialise a new root context with no values attached.
    pub fn root(logger: Logger) -> ContextBuilder {
        ContextBuilder {
            claim: None,
            logger,
        }
    }
}

/// A builder for root and derived contexts.
pub struct ContextBuilder {
    claim: Option<IdentityClaim>,
    logger: Logger,
}

impl ContextBuilder {
    /// Finalise the build process and return a new [`Context`].
    pub fn build(self) -> Context {
        Context {
            claim: self.claim,
            logger: self.logger,
        }
    }

    /// Attach the identity asserted for the request to the context.
    ///
    /// The claim kind is also attached to the logger.
    pub fn identified(mut self, claim: IdentityClaim) -> Self {
        self.logger = self.logger.new(slog::o!("claim" => claim.kind()));
        self.claim = Some(claim);
        self
    }

    /// Decorate the [`Context`]'s logger with the trace ID of the current OpenTelemetry span.
    pub fn log_trace(self) -> Self {
        let context = OtelContext::current();
        let span = context.span();
        let trace_id = span.span_context().trace_id();
        if trace_id == TraceId::INVALID {
            self
        } else {
            let trace_id = trace_id.to_string();
            self.log_values(slog::o!("trace_id" => trace_id))
        }
    }

    /// Update the [`Context`] logger to attach new log key/pair values.
    pub fn log_values<T>(mut self, entries: OwnedKV<T>) -> Self
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        self.logger = self.logger.new(entries);
        self
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Context {
    /// Create an empty context useful for test.
    pub fn fixture() -> Context {
        let logger = Logger::root(slog::Discard, slog::o!());
        Context {
            claim: None,
            logger,
        }
    }
}
