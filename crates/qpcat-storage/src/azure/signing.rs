//! Shared Key authorization for the Blob service.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::StorageConfigError;

type HmacSha256 = Hmac<Sha256>;

/// Standard headers in the order they appear in the string to sign.
const SIGNED_HEADERS: [&str; 11] = [
    "content-encoding",
    "content-language",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-unmodified-since",
    "range",
];

/// Account name plus the keyed MAC derived from its access key.
#[derive(Clone)]
pub struct SharedKey {
    account: String,
    mac: HmacSha256,
}

impl SharedKey {
    /// `encoded_key` is the base64 access key shown in the Azure portal.
    pub fn new(account: impl Into<String>, encoded_key: &str) -> Result<Self, StorageConfigError> {
        let key = STANDARD
            .decode(encoded_key.trim())
            .map_err(|e| StorageConfigError::InvalidAccountKey(e.to_string()))?;
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| StorageConfigError::InvalidAccountKey(e.to_string()))?;
        Ok(Self {
            account: account.into(),
            mac,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// `Authorization` header value for a request.
    ///
    /// `path` is the encoded URL path: `/{container}/{blob}`, preceded by the
    /// endpoint path on path-style emulators.
    pub fn authorization(
        &self,
        method: &str,
        headers: &[(String, String)],
        content_length: usize,
        path: &str,
    ) -> String {
        let payload = string_to_sign(
            method,
            headers,
            content_length,
            &format!("/{}{path}", self.account),
        );
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());
        format!("SharedKey {}:{signature}", self.account)
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKey")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> &'a str {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map_or("", |(_, v)| v.trim())
}

/// Build the canonical string. A zero content length is signed as empty.
pub(crate) fn string_to_sign(
    method: &str,
    headers: &[(String, String)],
    content_length: usize,
    resource: &str,
) -> String {
    let mut out = String::new();
    out.push_str(method);
    out.push('\n');
    for name in SIGNED_HEADERS {
        if name == "content-length" {
            if content_length > 0 {
                out.push_str(&content_length.to_string());
            }
        } else {
            out.push_str(header(headers, name));
        }
        out.push('\n');
    }

    let mut ms_headers: Vec<(String, &str)> = headers
        .iter()
        .filter(|(k, _)| k.to_ascii_lowercase().starts_with("x-ms-"))
        .map(|(k, v)| (k.to_ascii_lowercase(), v.trim()))
        .collect();
    ms_headers.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in ms_headers {
        out.push_str(&name);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }

    out.push_str(resource);
    out
}
