//! # hookgen-client
//!
//! Webhook delivery client for hookgen.
//!
//! Posts JSON payloads to a webhook endpoint with the header set a GitHub
//! hook receiver expects: an event-type label, an HMAC-SHA1 signature over
//! the raw body, a mock user agent, and a marker flagging the request as
//! synthetic. Only an HTTP 204 response counts as delivered; anything else
//! is logged and dropped without a retry.
//!
//! ## Example
//!
//! ```no_run
//! use hookgen_client::WebhookClient;
//! use hookgen_core::{run, RunPlan};
//!
//! let mut client = WebhookClient::new("http://localhost:8080", "secret");
//! let summary = run(&mut rand::thread_rng(), &mut client, &RunPlan::default()).unwrap();
//! println!("{} changes sent", summary.changes_sent);
//! ```

use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha1::Sha1;
use tracing::{debug, warn};

use hookgen_core::{EventType, WebhookSink};

type HmacSha1 = Hmac<Sha1>;

pub const USER_AGENT: &str = "GitHub-Hookshot/mock";

#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    secret: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl WebhookClient {
    /// Create a client posting to `url`, signing bodies with `secret`.
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: secret.into(),
            token: None,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Attach an optional bearer token sent as an `Authorization` header.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// The `X-Hub-Signature` value for `body`: `sha1=` followed by the hex
    /// HMAC-SHA1 digest of the exact bytes, keyed by the shared secret.
    pub fn signature(&self, body: &[u8]) -> String {
        let mut mac = HmacSha1::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(body);
        format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn request(&self, event: EventType, body: &[u8]) -> reqwest::blocking::RequestBuilder {
        let mut request = self
            .client
            .post(&self.url)
            .header("X-Github-Event", event.as_str())
            .header("X-Hub-Signature", self.signature(body))
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .header("Mock", "true")
            .body(body.to_vec());

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }
}

impl WebhookSink for WebhookClient {
    fn deliver(&mut self, event: EventType, body: &[u8]) -> bool {
        match self.request(event, body).send() {
            Ok(response) if response.status() == StatusCode::NO_CONTENT => true,
            Ok(response) => {
                debug!(
                    "Webhook rejected {} event with status {}",
                    event.as_str(),
                    response.status()
                );
                false
            }
            Err(e) => {
                warn!("Failed to deliver {} event: {}", event.as_str(), e);
                false
            }
        }
    }
}
