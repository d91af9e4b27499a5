//! RedfishClient trait: the session seam between the thermal traversal and HTTPS.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod session;

pub use session::HttpsRedfishClient;

/// Redfish service root path
pub const SERVICE_ROOT: &str = "/redfish/v1";

/// A fetched resource: HTTP status, raw body and the body parsed as JSON.
#[derive(Debug, Clone)]
pub struct RedfishResponse {
    pub status: u16,
    pub text: String,
    /// `Value::Null` when the body is empty or not JSON
    pub body: Value,
}

impl RedfishResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Extended error text of a failed response.
    /// Prefers `error.@Message.ExtendedInfo[].Message`, then `error.message`, then the raw body.
    pub fn extended_error(&self) -> String {
        let error = self.body.get("error");

        let extended: Vec<&str> = error
            .and_then(|e| e.get("@Message.ExtendedInfo"))
            .and_then(|info| info.as_array())
            .map(|items| items.iter().filter_map(|i| i.get("Message").and_then(|m| m.as_str())).collect())
            .unwrap_or_default();

        if !extended.is_empty() {
            return extended.join("\n");
        }

        error
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.text.clone())
    }
}

#[async_trait]
pub trait RedfishClient: Send + Sync {
    /// Authenticate and open the session
    async fn login(&self) -> Result<()>;

    /// GET a resource by path (relative to the BMC) or absolute URL
    async fn get(&self, path: &str) -> Result<RedfishResponse>;

    /// Close the session; a no-op when nothing is open
    async fn logout(&self) -> Result<()>;
}

/// Follow `keys` into `value` and return the `@odata.id` link found there.
/// An empty `keys` reads `@odata.id` of `value` itself.
pub fn odata_id<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .try_fold(value, |v, key| v.get(*key))?
        .get("@odata.id")
        .and_then(|id| id.as_str())
}
