//! The request mutator.
//!
//! [`mutate`] is a pure function: it reads a [`Request`], applies one
//! [`MutationAction`] to a *copy* of its URL, and returns a
//! [`ResponseDirective`] telling the router what to serve. Nothing is shared
//! between calls, so one [`RequestMutator`] can serve every connection.

use http::header::{HeaderName, HeaderValue, SET_COOKIE};
use tracing::{debug, warn};
use url::Url;

use crate::cookie;
use crate::error::MutationError;
use crate::request::Request;
use crate::response::Response;

use super::action::MutationAction;

/// What the router should do with a request after mutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponseDirective {
    /// Serve the original request unmodified.
    Pass,
    /// Serve `url` instead of the original target, then apply `overlay` to
    /// the response.
    Rewrite { url: Url, overlay: Option<Overlay> },
}

/// An additive instruction attached to an otherwise unchanged response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Overlay {
    SetCookie { name: String, value: String },
    DeleteCookie { name: String },
    Header { name: HeaderName, value: HeaderValue },
}

impl Overlay {
    /// Writes the overlay onto `response`.
    ///
    /// Headers replace whatever the handler set; cookies are appended as an
    /// extra `Set-Cookie`.
    pub fn apply(&self, response: &mut Response) {
        let set_cookie = match self {
            Self::Header { name, value } => {
                response.insert_header(name.clone(), value.clone());
                return;
            }
            Self::SetCookie { name, value } => cookie::set(name, value),
            Self::DeleteCookie { name } => cookie::remove(name),
        };
        for value in set_cookie {
            match HeaderValue::from_str(&value) {
                Ok(value) => response.append_header(SET_COOKIE, value),
                Err(_) => warn!(cookie = %value, "rendered cookie is not a valid header value, dropping it"),
            }
        }
    }
}

/// Applies `action` to `request`.
///
/// `request` is only read. The returned directive owns its own URL.
pub fn mutate(request: &Request, action: &MutationAction) -> Result<ResponseDirective, MutationError> {
    action.validate()?;

    let directive = match action {
        MutationAction::None => ResponseDirective::Pass,
        MutationAction::SetQueryParam { name, value } => ResponseDirective::Rewrite {
            url: set_query_param(request.url(), name, value),
            overlay: None,
        },
        MutationAction::DeleteQueryParam { name } => ResponseDirective::Rewrite {
            url: delete_query_param(request.url(), name),
            overlay: None,
        },
        MutationAction::SetCookie { name, value } => ResponseDirective::Rewrite {
            url: request.url().clone(),
            overlay: Some(Overlay::SetCookie { name: name.clone(), value: value.clone() }),
        },
        MutationAction::DeleteCookie { name } => ResponseDirective::Rewrite {
            url: request.url().clone(),
            overlay: Some(Overlay::DeleteCookie { name: name.clone() }),
        },
        MutationAction::SetHeader { name, value } => {
            let invalid = || MutationError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            if is_framing_header(&header_name) {
                return Err(invalid());
            }
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            ResponseDirective::Rewrite {
                url: request.url().clone(),
                overlay: Some(Overlay::Header { name: header_name, value: header_value }),
            }
        }
    };
    Ok(directive)
}

/// Headers that describe the connection or the message framing. hyper owns
/// them; an overlay must never override what it computed from the body.
fn is_framing_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "content-length"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Reads the mutation instruction off each request and applies it.
///
/// The router calls [`RequestMutator::intercept`] before route lookup; no
/// other registration exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestMutator;

impl RequestMutator {
    pub fn new() -> Self {
        Self
    }

    /// Parses the action carried by `request`'s query string and applies it.
    pub fn intercept(&self, request: &Request) -> Result<ResponseDirective, MutationError> {
        let action = MutationAction::from_request(request)?;
        let directive = mutate(request, &action)?;
        if let ResponseDirective::Rewrite { url, overlay } = &directive {
            debug!(
                action = ?action.kind(),
                from = %request.url(),
                to = %url,
                overlay = ?overlay,
                "request rewritten"
            );
        }
        Ok(directive)
    }
}

/// Sets `name` to `value`: the first occurrence is overwritten in place, later
/// ones are dropped, and the pair is appended when absent.
fn set_query_param(url: &Url, name: &str, value: &str) -> Url {
    let mut found = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (k, v) in url.query_pairs() {
        if k != name {
            pairs.push((k.into_owned(), v.into_owned()));
        } else if !found {
            found = true;
            pairs.push((k.into_owned(), value.to_owned()));
        }
    }
    if !found {
        pairs.push((name.to_owned(), value.to_owned()));
    }
    with_query(url, &pairs)
}

fn delete_query_param(url: &Url, name: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    with_query(url, &pairs)
}

/// `url` with its query replaced by `pairs`; no `?` at all when `pairs` is empty.
fn with_query(url: &Url, pairs: &[(String, String)]) -> Url {
    let mut out = url.clone();
    if pairs.is_empty() {
        out.set_query(None);
    } else {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        out.set_query(Some(&query));
    }
    out
}
