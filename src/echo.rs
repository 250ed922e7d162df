//! Debug handlers that echo back the request they received.
//!
//! They exist so the effect of a mutation can be observed from the outside:
//! whatever URL and headers the handler sees after rewriting is what the
//! client gets back.
//!
//! | route | body | `url` field |
//! |---|---|---|
//! | `/api/edge` | JSON | absolute (`https://host/path?query`) |
//! | `/api/node` | JSON | origin-form (`/path?query`) |
//! | `/page/edge` | `<div>---{json}---</div>` | absolute |
//! | `/page/node` | `<div>---{json}---</div>` | origin-form |

use std::collections::BTreeMap;

use http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};
use url::Position;

use crate::middleware::RequestMutator;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;

/// The serialized view of a request.
#[derive(Debug, Serialize)]
pub struct RequestSnapshot {
    pub headers: BTreeMap<String, String>,
    pub url: String,
}

#[derive(Clone, Copy)]
enum UrlForm {
    Absolute,
    Origin,
}

impl RequestSnapshot {
    fn capture(req: &Request, form: UrlForm) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in req.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            headers
                .entry(name.as_str().to_owned())
                .and_modify(|joined| {
                    joined.push_str(", ");
                    joined.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }
        let url = match form {
            UrlForm::Absolute => req.url().to_string(),
            UrlForm::Origin => req.url()[Position::BeforePath..Position::AfterQuery].to_owned(),
        };
        Self { headers, url }
    }
}

/// The fixture application: every echo route, behind the request mutator.
pub fn router() -> Router {
    Router::new()
        .get("/api/edge", api_edge)
        .get("/api/node", api_node)
        .get("/page/edge", page_edge)
        .get("/page/node", page_node)
        .with_mutator(RequestMutator::new())
}

pub async fn api_edge(req: Request) -> Response {
    api(&req, UrlForm::Absolute)
}

pub async fn api_node(req: Request) -> Response {
    api(&req, UrlForm::Origin)
}

pub async fn page_edge(req: Request) -> Response {
    page(&req, UrlForm::Absolute)
}

pub async fn page_node(req: Request) -> Response {
    page(&req, UrlForm::Origin)
}

fn api(req: &Request, form: UrlForm) -> Response {
    debug!(request = ?req, "echoing request");
    Json(RequestSnapshot::capture(req, form)).into_response()
}

fn page(req: &Request, form: UrlForm) -> Response {
    debug!(request = ?req, "rendering debug page");
    match serde_json::to_string(&RequestSnapshot::capture(req, form)) {
        Ok(json) => Response::html(format!("<div>---{}---</div>", escape_html(&json))),
        Err(e) => {
            error!(error = %e, "failed to serialize request snapshot");
            Response::status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Escapes the characters that would let echoed input open a tag or entity.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    fn request(url: &str, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri(url);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Request::try_from(builder.body(Bytes::new()).unwrap()).unwrap()
    }

    #[test]
    fn snapshot_joins_repeated_headers() {
        let req = request(
            "https://example.com/api/edge?a=1",
            &[("Accept", "text/html"), ("x-multi", "1"), ("x-multi", "2")],
        );
        let snapshot = RequestSnapshot::capture(&req, UrlForm::Absolute);

        assert_eq!(snapshot.headers["accept"], "text/html");
        assert_eq!(snapshot.headers["x-multi"], "1, 2");
        assert_eq!(snapshot.url, "https://example.com/api/edge?a=1");
    }

    #[test]
    fn origin_form_drops_scheme_and_host() {
        let req = request("https://example.com/api/node?a=1#frag", &[]);
        let snapshot = RequestSnapshot::capture(&req, UrlForm::Origin);
        assert_eq!(snapshot.url, "/api/node?a=1");
    }

    #[tokio::test]
    async fn api_returns_json() {
        let res = api_edge(request("https://example.com/api/edge", &[("x-a", "b")])).await;
        assert_eq!(
            res.body().as_ref(),
            br#"{"headers":{"x-a":"b"},"url":"https://example.com/api/edge"}"#
        );
    }

    #[tokio::test]
    async fn page_wraps_escaped_json() {
        let res = page_node(request("https://example.com/page/node", &[("x-a", "<b>")])).await;
        assert_eq!(
            res.body().as_ref(),
            br#"<div>---{"headers":{"x-a":"&lt;b&gt;"},"url":"/page/node"}---</div>"#
        );
    }
}
