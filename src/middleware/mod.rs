//! Middleware layer.
//!
//! Two pieces run around every request the [`Router`](crate::Router) handles:
//!
//! - `trace` — per-request span with method, path, status, latency
//! - [`mutate`] — the query-driven request mutator
//!
//! # Request mutation
//!
//! A request can ask to be rewritten before it reaches its handler:
//!
//! | `action` | needs | effect |
//! |---|---|---|
//! | `set-query-param` | `name`, `value` | sets the query parameter, rewrites the URL |
//! | `delete-query-param` | `name` | removes every occurrence, rewrites the URL |
//! | `set-cookie` | `name`, `value` | adds `Set-Cookie: name=value` to the response |
//! | `delete-cookie` | `name` | adds a removal `Set-Cookie` to the response |
//! | `set-header` | `name`, `value` | sets `name: value` on the response |
//!
//! The mutator runs only when installed with
//! [`Router::with_mutator`](crate::Router::with_mutator).

mod action;
mod mutate;
pub(crate) mod trace;

pub use action::{ACTION_PARAM, ActionKind, Field, MutationAction, NAME_PARAM, VALUE_PARAM};
pub use mutate::{Overlay, RequestMutator, ResponseDirective, mutate};
