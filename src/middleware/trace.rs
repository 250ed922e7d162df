//! Per-request tracing: one span, one completion line.

use std::time::Instant;

use tracing::{Span, info, info_span};

use crate::request::Request;
use crate::response::Response;

/// Tracks a single request from arrival to response.
pub(crate) struct RequestTrace {
    span: Span,
    started: Instant,
}

impl RequestTrace {
    pub(crate) fn start(req: &Request) -> Self {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        Self { span, started: Instant::now() }
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn finish(self, res: &Response) {
        let latency_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.span.in_scope(|| {
            info!(status = res.status_code().as_u16(), latency_us, "request completed");
        });
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    #[test]
    fn finish_records_completion_without_a_subscriber() {
        let req = http::Request::builder()
            .uri("https://example.com/api/edge?a=1")
            .body(Bytes::new())
            .unwrap();
        let trace = RequestTrace::start(&Request::try_from(req).unwrap());

        assert!(trace.span().is_disabled());
        trace.finish(&Response::status(StatusCode::NO_CONTENT));
    }
}
