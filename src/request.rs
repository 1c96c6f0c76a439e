use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A query or form value: a scalar, or an array serialized with the bracket
/// suffix so the backend can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

/// A file part of a multipart upload
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Multipart field name
    pub name: String,
    /// Original file name
    pub file_name: String,
    /// MIME type, when known
    pub mime: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        FilePart {
            name: name.into(),
            file_name: file_name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Request body. Structured payloads are form-encoded before transmission;
/// only multipart uploads pass through as-is.
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Form(Vec<(String, QueryValue)>),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<FilePart>,
    },
}

/// Descriptor for one API request: method, path, query and body.
///
/// The descriptor stays plain data so a failed attempt can be re-issued after
/// a token refresh; `retried` is the one-shot marker guarding against more
/// than one recovery attempt per original call.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
    pub body: Body,
    pub(crate) retried: bool,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters from a serializable mapping
    pub fn with_query<T>(mut self, params: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        self.query = to_pairs(params)?;
        Ok(self)
    }

    /// Attach already-flattened query pairs
    pub fn with_query_pairs(mut self, pairs: Vec<(String, QueryValue)>) -> Self {
        self.query = pairs;
        self
    }

    /// Attach a structured body, to be form-encoded at send time
    pub fn with_form<T>(mut self, body: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        self.body = Body::Form(to_pairs(body)?);
        Ok(self)
    }

    /// Attach a multipart body of text fields and file parts
    pub fn with_multipart(mut self, fields: Vec<(String, String)>, files: Vec<FilePart>) -> Self {
        self.body = Body::Multipart { fields, files };
        self
    }

    /// Whether this request already consumed its single permitted retry
    pub fn retried(&self) -> bool {
        self.retried
    }
}

/// Flatten a serializable mapping into ordered key/value pairs.
///
/// Top-level scalars become `QueryValue::One`, arrays of scalars become
/// `QueryValue::Many`, and nulls are dropped. Nested structures are rejected;
/// the backend only understands flat form data.
pub fn to_pairs<T>(value: &T) -> Result<Vec<(String, QueryValue)>>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::RequestBuild(format!(
                "expected a mapping of parameters, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());

    for (key, value) in map {
        match value {
            Value::Null => continue,
            Value::Array(items) => {
                let mut many = Vec::with_capacity(items.len());
                for item in &items {
                    many.push(scalar_string(item).ok_or_else(|| {
                        ApiError::RequestBuild(format!(
                            "parameter '{}' contains a non-scalar array element",
                            key
                        ))
                    })?);
                }
                pairs.push((key, QueryValue::Many(many)));
            }
            other => {
                let scalar = scalar_string(&other).ok_or_else(|| {
                    ApiError::RequestBuild(format!("parameter '{}' is not a scalar", key))
                })?;
                pairs.push((key, QueryValue::One(scalar)));
            }
        }
    }

    Ok(pairs)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

/// Serialize pairs in the canonical form the backend expects: keys in the
/// given order, array values repeated with a literal `[]` suffix, components
/// percent-encoded. Used for both query strings and form-encoded bodies.
pub fn encode_pairs(pairs: &[(String, QueryValue)]) -> String {
    let mut out = String::new();

    for (key, value) in pairs {
        match value {
            QueryValue::One(v) => {
                push_pair(&mut out, &encode_component(key), v);
            }
            QueryValue::Many(values) => {
                let bracketed = format!("{}[]", encode_component(key));
                for v in values {
                    push_pair(&mut out, &bracketed, v);
                }
            }
        }
    }

    out
}

fn push_pair(out: &mut String, encoded_key: &str, value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    out.push_str(encoded_key);
    out.push('=');
    out.push_str(&encode_component(value));
}

fn encode_component(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
