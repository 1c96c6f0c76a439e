use crate::client::{create_http_client, Config, Navigator, NoopNavigator};
use crate::endpoints::{HOME_PATH, REFRESH_TOKEN_PATH};
use crate::error::{classify, ApiError, Outcome, Result};
use crate::request::{encode_pairs, Body, FilePart, Request};
use crate::response::ApiResponse;
use crate::session::{MemorySessionStore, Session, SessionStore};
use reqwest::Method;
use std::sync::Arc;
use url::Url;

/// Role marker that gates access-token persistence
pub const ADMIN_ROLE: &str = "ADMIN";

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Authenticated client for the back-office API.
///
/// Attaches the current session's bearer token to every request, persists
/// tokens minted by the auth endpoints, and recovers from an expired access
/// token with a single coordinated refresh-and-retry. A rejected refresh
/// credential terminates the session: the store is wiped and the navigator is
/// pointed at the landing page.
pub struct ApiClient {
    /// HTTP client
    pub http: reqwest::Client,
    /// Configuration
    pub config: Config,
    /// Session slot read at send time and written on auth successes
    pub session: Arc<dyn SessionStore>,
    /// Receiver of the forced navigation on terminal auth failure
    pub navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client with default configuration, an in-memory session store
    /// and no navigation sink
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: Config) -> Self {
        ApiClient {
            http: create_http_client(config.timeout),
            config,
            session: Arc::new(MemorySessionStore::new()),
            navigator: Arc::new(NoopNavigator),
        }
    }

    /// Set the session store
    pub fn with_session_store(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    /// Set the navigation sink
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Issue a request, transparently recovering from an expired access
    /// token.
    ///
    /// A session-invalid failure on an ordinary endpoint triggers one refresh
    /// call followed by one retry of the original request; the retry's
    /// outcome is returned as-is. A session-invalid failure on the refresh
    /// endpoint itself wipes the session, navigates to the landing page and
    /// rejects. Every other error propagates unchanged.
    pub async fn request(&self, request: Request) -> Result<ApiResponse> {
        let error = match self.send_once(&request, None).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        match classify(&request.path, &error, request.retried) {
            Outcome::Terminal => Err(self.terminate_session()),
            Outcome::Refresh => {
                tracing::debug!(path = %request.path, "access token rejected, refreshing session");
                let refreshed = self.refresh_session().await?;

                let mut retry = request;
                retry.retried = true;

                // prefer the token straight off the refresh response; the
                // store may lag if the backend omitted the role marker
                let bearer = refreshed
                    .access_token()
                    .map(str::to_string)
                    .or_else(|| self.session.get().map(|s| s.access_token));

                self.send_once(&retry, bearer.as_deref()).await
            }
            Outcome::Propagate => Err(error),
        }
    }

    /// Mint a new access token.
    ///
    /// The refresh call flows through the same classification as any other
    /// request; because its path identifies the refresh endpoint, a
    /// session-invalid failure here is terminal, never a further retry.
    pub async fn refresh_session(&self) -> Result<ApiResponse> {
        let request = Request::get(REFRESH_TOKEN_PATH);

        match self.send_once(&request, None).await {
            Ok(response) => Ok(response),
            Err(error) => match classify(&request.path, &error, request.retried) {
                Outcome::Terminal => Err(self.terminate_session()),
                _ => Err(error),
            },
        }
    }

    /// Wipe the local session and send the host application home.
    ///
    /// The whole store is cleared, not just the token slot, the same full
    /// local-storage wipe the web console performs.
    fn terminate_session(&self) -> ApiError {
        tracing::warn!("refresh credential rejected, terminating session");
        self.session.clear();
        self.navigator.replace(HOME_PATH);
        ApiError::SessionTerminated
    }

    /// Execute exactly one attempt of a request.
    ///
    /// The bearer credential is resolved here, at send time: an explicit
    /// override (set by the retry path) wins, otherwise whatever the session
    /// store currently holds is attached. No expiry check is made.
    async fn send_once(&self, request: &Request, bearer: Option<&str>) -> Result<ApiResponse> {
        if !ALLOWED_METHODS.contains(&request.method) {
            return Err(ApiError::RequestBuild(format!(
                "unsupported HTTP method: {}",
                request.method
            )));
        }

        let mut url = format!("{}{}", self.config.base_url, request.path);
        if !request.query.is_empty() {
            url.push('?');
            url.push_str(&encode_pairs(&request.query));
        }
        let url = Url::parse(&url)?;

        let mut builder = self.http.request(request.method.clone(), url);

        let token = match bearer {
            Some(token) => Some(token.to_string()),
            None => self.session.get().map(|s| s.access_token),
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Form(pairs) => builder
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(encode_pairs(pairs)),
            Body::Multipart { fields, files } => builder.multipart(build_multipart(fields, files)?),
        };

        let start = std::time::Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );

        let decoded = ApiResponse::from_body(status.as_u16(), &body).map_err(|e| {
            if status.is_client_error() || status.is_server_error() {
                ApiError::Http {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).to_string(),
                    source: Some(Box::new(e)),
                }
            } else {
                ApiError::Json(e)
            }
        })?;

        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::from_response(decoded));
        }

        self.persist_token(&decoded);

        Ok(decoded)
    }

    /// Persist a freshly minted access token.
    ///
    /// Only the success shape carrying both a token and the admin role marker
    /// writes to the store; no other field triggers persistence. The refresh
    /// token is kept from the previous session when the response omits one.
    fn persist_token(&self, response: &ApiResponse) {
        let Some(token) = response.access_token() else {
            return;
        };
        if response.role() != Some(ADMIN_ROLE) {
            return;
        }

        let refresh_token = response
            .refresh_token()
            .map(str::to_string)
            .or_else(|| self.session.get().and_then(|s| s.refresh_token));

        self.session.set(Session {
            access_token: token.to_string(),
            refresh_token,
        });
        tracing::debug!("persisted new access token");
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ApiClient {
    fn clone(&self) -> Self {
        ApiClient {
            http: self.http.clone(),
            config: self.config.clone(),
            session: Arc::clone(&self.session),
            navigator: Arc::clone(&self.navigator),
        }
    }
}

fn build_multipart(
    fields: &[(String, String)],
    files: &[FilePart],
) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();

    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }

    for file in files {
        let mut part =
            reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime).map_err(|e| {
                ApiError::RequestBuild(format!("invalid MIME type '{}': {}", mime, e))
            })?;
        }
        form = form.part(file.name.clone(), part);
    }

    Ok(form)
}
