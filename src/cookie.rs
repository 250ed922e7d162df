//! Cookie parsing and `Set-Cookie` rendering, backed by [`biscotti`].

use std::sync::LazyLock;

use biscotti::{
    Processor, ProcessorConfig, RemovalCookie, RequestCookies, ResponseCookie, ResponseCookies,
};
use http::HeaderMap;
use http::header::COOKIE;
use tracing::warn;

/// Plain (unsigned, unencrypted) cookies with percent-encoding.
static PROCESSOR: LazyLock<Processor> = LazyLock::new(|| ProcessorConfig::default().into());

/// Finds the first cookie called `name` across every `Cookie` header.
///
/// Malformed headers are skipped with a warning; one bad header should not
/// hide the cookies carried by the others.
pub(crate) fn find(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            warn!("cookie header is not valid ascii, ignoring it");
            continue;
        };
        let mut cookies = RequestCookies::new();
        if let Err(e) = cookies.extend_from_header(header, &PROCESSOR) {
            warn!(error = %e, "a request cookie is invalid, ignoring it");
            continue;
        }
        if let Some(cookie) = cookies.get(name) {
            return Some(cookie.value().to_owned());
        }
    }
    None
}

/// `Set-Cookie` header values that store `name=value` for the whole site.
pub(crate) fn set(name: &str, value: &str) -> Vec<String> {
    let cookie = ResponseCookie::new(name.to_owned(), value.to_owned()).set_path("/");
    render(cookie)
}

/// `Set-Cookie` header values that tell the client to drop `name`.
pub(crate) fn remove(name: &str) -> Vec<String> {
    let cookie = RemovalCookie::new(name.to_owned()).set_path("/");
    render(cookie.into())
}

fn render(cookie: ResponseCookie<'static>) -> Vec<String> {
    let mut cookies: ResponseCookies<'static> = ResponseCookies::default();
    cookies.insert(cookie);
    cookies.header_values(&PROCESSOR).collect()
}
