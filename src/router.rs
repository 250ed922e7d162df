//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. When a
//! [`RequestMutator`] is installed it runs first, and route lookup happens on
//! the URL it hands back.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::{Instrument, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::trace::RequestTrace;
use crate::middleware::{RequestMutator, ResponseDirective};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    mutator: Option<RequestMutator>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), mutator: None }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or clashes with one
    /// already registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::GET, path, handler)`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Runs `mutator` on every request before route lookup.
    pub fn with_mutator(mut self, mutator: RequestMutator) -> Self {
        self.mutator = Some(mutator);
        self
    }

    /// Serves one request: mutation, lookup, handler, overlay.
    ///
    /// A rejected mutation answers `400 Bad Request` with the reason as body
    /// and never reaches a handler. An unknown route answers `404`; the
    /// overlay, if any, is still applied to it.
    pub async fn handle(&self, req: Request) -> Response {
        let trace = RequestTrace::start(&req);
        let span = trace.span().clone();
        let response = self.respond(req).instrument(span).await;
        trace.finish(&response);
        response
    }

    async fn respond(&self, req: Request) -> Response {
        let directive = match &self.mutator {
            Some(mutator) => match mutator.intercept(&req) {
                Ok(directive) => directive,
                Err(e) => {
                    warn!(error = %e, url = %req.url(), "rejected request mutation");
                    return Response::builder()
                        .status(StatusCode::BAD_REQUEST)
                        .text(e.to_string());
                }
            },
            None => ResponseDirective::Pass,
        };

        let (req, overlay) = match directive {
            ResponseDirective::Pass => (req, None),
            ResponseDirective::Rewrite { url, overlay } => (req.rewritten(url), overlay),
        };

        let mut response = match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => handler.call(req.with_params(params)).await,
            None => Response::status(StatusCode::NOT_FOUND),
        };

        if let Some(overlay) = overlay {
            overlay.apply(&mut response);
        }
        response
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
