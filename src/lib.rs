//! # reroute
//!
//! A minimal HTTP framework with one built-in trick: a request can carry an
//! instruction in its own query string, and the router rewrites the request
//! before any handler sees it.
//!
//! ```text
//! GET /api/edge?a=1&action=set-query-param&name=b&value=2
//!     → handler sees /api/edge?a=1&action=set-query-param&name=b&value=2&b=2
//! GET /api/edge?action=set-cookie&name=sid&value=xyz
//!     → response carries Set-Cookie: sid=xyz
//! GET /api/edge?action=bogus
//!     → 400 Bad Request
//! ```
//!
//! The mutation itself is a pure function, [`middleware::mutate`]; the
//! [`Router`] calls it explicitly through [`RequestMutator`] when one is
//! installed with [`Router::with_mutator`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reroute::{Request, RequestMutator, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .get("/users/{id}", get_user)
//!         .with_mutator(RequestMutator::new());
//!
//!     let addr = "0.0.0.0:3000".parse().unwrap();
//!     Server::bind(addr).serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//! ```

mod cookie;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod echo;
pub mod logging;
pub mod middleware;

pub use error::{Error, MutationError};
pub use handler::Handler;
pub use middleware::{MutationAction, RequestMutator, ResponseDirective};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
