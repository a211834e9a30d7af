use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Instant;

use crate::error::ForwardError;
use crate::metrics::{UPSTREAM_ERRORS, UPSTREAM_LATENCY};
use crate::models::MessageEnvelope;

// One-shot POST of an envelope to a webhook url
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send the envelope and return the parsed JSON reply, whatever the HTTP
    /// status. A body that is not JSON is an error carrying the raw text.
    pub async fn send(&self, url: &str, envelope: &MessageEnvelope) -> Result<Value, ForwardError> {
        let payload = serde_json::to_vec(envelope)?;
        let start_time = Instant::now();

        // reqwest sets Content-Length from the buffered body
        let result = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await;

        let response = match result {
            Ok(res) => res,
            Err(e) => {
                UPSTREAM_ERRORS.inc();
                return Err(ForwardError::Transport(e));
            }
        };
        let status = response.status();
        let body = response.text().await.inspect_err(|_| UPSTREAM_ERRORS.inc())?;
        UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

        tracing::debug!(%status, "upstream responded");

        serde_json::from_str(&body).map_err(|_| {
            UPSTREAM_ERRORS.inc();
            ForwardError::InvalidResponse { body }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forwarder() -> Forwarder {
        Forwarder::new(reqwest::Client::new())
    }

    #[tokio::test]
    async fn posts_json_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "msgtype": "text", "text": { "content": "hi" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = forwarder()
            .send(&format!("{}/send", server.uri()), &MessageEnvelope::text("hi"))
            .await
            .unwrap();
        assert_eq!(reply, json!({ "errcode": 0, "errmsg": "ok" }));
    }

    #[tokio::test]
    async fn non_success_status_still_resolves() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "errcode": 45009 })))
            .mount(&server)
            .await;

        let reply = forwarder()
            .send(&server.uri(), &MessageEnvelope::text("hi"))
            .await
            .unwrap();
        assert_eq!(reply["errcode"], 45009);
    }

    #[tokio::test]
    async fn non_json_reply_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = forwarder()
            .send(&server.uri(), &MessageEnvelope::text("hi"))
            .await
            .unwrap_err();
        match err {
            ForwardError::InvalidResponse { body } => assert_eq!(body, "Bad Gateway"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // nothing listens on port 1
        let err = forwarder()
            .send("http://127.0.0.1:1/send", &MessageEnvelope::text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::Transport(_)));
    }
}
