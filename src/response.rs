use serde::Deserialize;
use serde_json::Value;

/// A decoded back-office API response.
///
/// Every endpoint wraps its payload in a `data` envelope; success payloads
/// carry the resource (and, after auth calls, a fresh access token and role),
/// error payloads carry a `message` string used for session classification.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// The `data` envelope, when the body carried one
    pub data: Option<Value>,
}

#[derive(Deserialize)]
struct Wire {
    #[serde(default)]
    data: Option<Value>,
}

impl ApiResponse {
    /// Decode a response body. Empty bodies decode to an empty envelope.
    pub fn from_body(status: u16, body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.is_empty() {
            return Ok(ApiResponse { status, data: None });
        }

        let wire: Wire = serde_json::from_slice(body)?;
        Ok(ApiResponse {
            status,
            data: wire.data,
        })
    }

    /// Get the raw data value from the response
    pub fn raw(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Get a value from the response data by a slash-separated path.
    /// For example, "airline/title" accesses the "title" field inside the
    /// "airline" object.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut current = self.data.as_ref()?;

        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value from the response data by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    /// The backend's human-readable message, present on errors and some
    /// successes
    pub fn message(&self) -> Option<&str> {
        self.get("message").and_then(|v| v.as_str())
    }

    /// A freshly minted access token, present on auth endpoint successes
    pub fn access_token(&self) -> Option<&str> {
        self.get("accessToken").and_then(|v| v.as_str())
    }

    /// A refresh token, for backends that return it in the body
    pub fn refresh_token(&self) -> Option<&str> {
        self.get("refreshToken").and_then(|v| v.as_str())
    }

    /// The authenticated user's role marker
    pub fn role(&self) -> Option<&str> {
        self.get("role").and_then(|v| v.as_str())
    }

    /// Unmarshal the response data into the provided type
    pub fn apply<T>(&self) -> Result<T, crate::error::ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        match &self.data {
            Some(data) => serde_json::from_value(data.clone()).map_err(|e| e.into()),
            None => serde_json::from_value(Value::Null).map_err(|e| e.into()),
        }
    }
}
