use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Timestamp format required by EG1-HMAC-SHA256
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S+0000";

/// The parts of a request that are covered by the signature
pub struct SignedRequest<'a> {
    pub method: &'a str,
    pub scheme: &'a str,
    pub host: &'a str,
    /// Path plus query string, e.g. `/cloudlets/api/v2/policies?offset=0`
    pub path_and_query: &'a str,
    pub body: Option<&'a [u8]>,
}

/// Builds `Authorization` headers for EdgeGrid requests
pub struct Signer<'a> {
    credentials: &'a Credentials,
}

impl<'a> Signer<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Sign with the current time and a fresh nonce
    pub fn authorization(&self, request: &SignedRequest) -> String {
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let nonce = uuid::Uuid::new_v4().to_string();
        self.authorization_at(request, &timestamp, &nonce)
    }

    /// Sign with an explicit timestamp and nonce
    pub fn authorization_at(&self, request: &SignedRequest, timestamp: &str, nonce: &str) -> String {
        let auth_header = format!(
            "EG1-HMAC-SHA256 client_token={};access_token={};timestamp={};nonce={};",
            self.credentials.client_token, self.credentials.access_token, timestamp, nonce
        );

        let data_to_sign = [
            request.method.to_uppercase(),
            request.scheme.to_string(),
            request.host.to_lowercase(),
            request.path_and_query.to_string(),
            String::new(),
            self.content_hash(request),
            auth_header.clone(),
        ]
        .join("\t");

        let signing_key = hmac_base64(self.credentials.client_secret.as_bytes(), timestamp.as_bytes());
        let signature = hmac_base64(signing_key.as_bytes(), data_to_sign.as_bytes());

        format!("{}signature={}", auth_header, signature)
    }

    /// Only POST bodies are hashed, truncated to `max_body`
    fn content_hash(&self, request: &SignedRequest) -> String {
        match request.body {
            Some(body) if request.method.eq_ignore_ascii_case("POST") && !body.is_empty() => {
                let end = body.len().min(self.credentials.max_body);
                STANDARD.encode(Sha256::digest(&body[..end]))
            }
            _ => String::new(),
        }
    }
}

fn hmac_base64(key: &[u8], message: &[u8]) -> String {
    // HMAC accepts keys of any length, new_from_slice cannot fail here
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(message);
    STANDARD.encode(mac.finalize().into_bytes())
}
