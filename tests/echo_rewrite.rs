use bytes::Bytes;
use http::StatusCode;
use http::header::{COOKIE, SET_COOKIE};
use pretty_assertions::assert_eq;
use reroute::{Request, Response, echo};
use serde_json::Value;

async fn get(url: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = http::Request::builder().uri(url);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = Request::try_from(builder.body(Bytes::new()).unwrap()).unwrap();
    echo::router().handle(req).await
}

fn echoed(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

fn set_cookies(res: &Response) -> Vec<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn no_action_passes_through() {
    let res = get("https://example.com/api/edge?a=1", &[]).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(echoed(&res)["url"], "https://example.com/api/edge?a=1");
    assert!(set_cookies(&res).is_empty());
}

#[tokio::test]
async fn set_query_param_is_visible_to_the_handler() {
    let res = get(
        "https://example.com/api/edge?a=1&action=set-query-param&name=b&value=2",
        &[],
    )
    .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(
        echoed(&res)["url"],
        "https://example.com/api/edge?a=1&action=set-query-param&name=b&value=2&b=2"
    );
}

#[tokio::test]
async fn delete_query_param_on_node_route() {
    let res = get(
        "https://example.com/api/node?a=1&action=delete-query-param&a=2&name=a",
        &[],
    )
    .await;

    assert_eq!(echoed(&res)["url"], "/api/node?action=delete-query-param&name=a");
}

#[tokio::test]
async fn set_cookie_adds_set_cookie_header() {
    let res = get("https://example.com/api/edge?action=set-cookie&name=sid&value=xyz", &[]).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(
        echoed(&res)["url"],
        "https://example.com/api/edge?action=set-cookie&name=sid&value=xyz"
    );
    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("sid=xyz"), "{}", cookies[0]);
}

#[tokio::test]
async fn delete_cookie_expires_the_cookie_and_keeps_the_url() {
    let res = get(
        "https://example.com/api/edge?action=delete-cookie&name=sid",
        &[(COOKIE.as_str(), "sid=xyz")],
    )
    .await;

    assert_eq!(
        echoed(&res)["url"],
        "https://example.com/api/edge?action=delete-cookie&name=sid"
    );
    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("sid="), "{}", cookies[0]);
    assert!(!cookies[0].starts_with("sid=xyz"), "{}", cookies[0]);
}

#[tokio::test]
async fn set_header_lands_on_the_response() {
    let res = get(
        "https://example.com/page/edge?action=set-header&name=x-fixture&value=on",
        &[],
    )
    .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.headers()["x-fixture"], "on");
    let body = std::str::from_utf8(res.body()).unwrap();
    assert!(body.starts_with("<div>---{"), "{body}");
    assert!(body.ends_with("}---</div>"), "{body}");
}

#[tokio::test]
async fn incoming_headers_are_echoed() {
    let res = get("https://example.com/api/edge", &[("X-Request-Id", "abc")]).await;
    assert_eq!(echoed(&res)["headers"]["x-request-id"], "abc");
}

#[tokio::test]
async fn missing_value_is_rejected_before_any_handler_runs() {
    let res = get("https://example.com/api/edge?action=set-header&name=x-fixture", &[]).await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.body().as_ref(), b"must set name and value to add a header");
}

#[tokio::test]
async fn framing_headers_cannot_be_overridden() {
    for name in ["content-length", "transfer-encoding", "connection"] {
        let url = format!("https://example.com/api/edge?action=set-header&name={name}&value=3");
        let res = get(&url, &[]).await;

        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST, "{name}");
        assert!(!res.headers().contains_key(name), "{name}");
    }
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let res = get("https://example.com/api/edge?action=bogus-action", &[]).await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body().as_ref(),
        b"unrecognized action received in middleware: bogus-action"
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let res = get("https://example.com/nope", &[]).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}
