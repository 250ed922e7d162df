//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::HOST;
use http::{HeaderMap, Method};
use url::Url;

use crate::cookie;
use crate::error::Error;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// An incoming HTTP request.
///
/// Immutable once built: handlers and the request mutator only ever see it by
/// reference or by value, never through a setter. A rewrite produces a new
/// `Request` via [`Request::rewritten`] and leaves the original untouched.
///
/// The URL is always absolute. Behind a reverse proxy the scheme comes from
/// `x-forwarded-proto`, the host from the request target or `Host`.
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from the parts hyper hands us plus the collected body.
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Result<Self, Error> {
        let url = absolute_url(&parts.uri, &parts.headers)?;
        Ok(Self {
            method: parts.method,
            url,
            headers: parts.headers,
            body,
            params: HashMap::new(),
        })
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn url(&self) -> &Url { &self.url }
    pub fn path(&self) -> &str { self.url.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Case-insensitive header lookup. Returns `None` for non-visible-ASCII values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value of the query parameter `name`, percent-decoded.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Value of the cookie `name`, searched across every `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<String> {
        cookie::find(&self.headers, name)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A copy of this request aimed at `url`. Headers and body are shared.
    pub fn rewritten(&self, url: Url) -> Self {
        Self {
            method: self.method.clone(),
            url,
            headers: self.headers.clone(),
            body: self.body.clone(),
            params: HashMap::new(),
        }
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }
}

impl TryFrom<http::Request<Bytes>> for Request {
    type Error = Error;

    fn try_from(req: http::Request<Bytes>) -> Result<Self, Self::Error> {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}

fn absolute_url(uri: &http::Uri, headers: &HeaderMap) -> Result<Url, Error> {
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(uri.scheme_str())
        .unwrap_or("http");
    let host = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| headers.get(HOST).and_then(|v| v.to_str().ok()))
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map_or("/", |p| p.as_str());

    let raw = format!("{scheme}://{host}{path_and_query}");
    Url::parse(&raw).map_err(|source| Error::Url { url: raw, source })
}
