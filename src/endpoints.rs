//! Typed wrappers for the back-office endpoints.
//!
//! Every wrapper funnels through [`ApiClient::request`], so all of them share
//! the bearer attachment, token persistence and refresh-and-retry behavior.

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{AirlineForm, TicketForm};
use crate::request::{to_pairs, FilePart, QueryValue, Request};
use crate::response::ApiResponse;
use serde::Serialize;
use serde_json::Value;

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const PROFILE_PATH: &str = "/profile";
pub const AIRLINE_PATH: &str = "/airline";
pub const TICKET_PATH: &str = "/ticket";

/// Landing page the client navigates to when the session is terminated
pub const HOME_PATH: &str = "/home";

/// Multipart field the backend expects the airline thumbnail under
const THUMBNAIL_FIELD: &str = "single";

impl ApiClient {
    /// POST `/auth/register`
    pub async fn register<T>(&self, user: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.request(Request::post(REGISTER_PATH).with_form(user)?)
            .await
    }

    /// POST `/auth/login`. A successful admin login persists the returned
    /// access token.
    pub async fn login<T>(&self, credentials: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.request(Request::post(LOGIN_PATH).with_form(credentials)?)
            .await
    }

    /// GET `/auth/logout`. The local session slot is cleared whether or not
    /// the server call succeeds.
    pub async fn logout(&self) -> Result<ApiResponse> {
        let result = self.request(Request::get(LOGOUT_PATH)).await;
        self.session.clear();
        result
    }

    /// GET `/profile`
    pub async fn profile(&self) -> Result<ApiResponse> {
        self.request(Request::get(PROFILE_PATH)).await
    }

    /// GET `/airline`, with the filter attached as query parameters only when
    /// it is non-empty
    pub async fn airlines(&self, filter: Option<&Value>) -> Result<ApiResponse> {
        self.request(collection_request(AIRLINE_PATH, filter)?).await
    }

    /// GET `/airline/{id}`
    pub async fn airline(&self, id: &str) -> Result<ApiResponse> {
        self.request(Request::get(format!("{}/{}", AIRLINE_PATH, id)))
            .await
    }

    /// POST `/airline`
    pub async fn create_airline(
        &self,
        airline: &AirlineForm,
        thumbnail: Option<FilePart>,
    ) -> Result<ApiResponse> {
        self.request(airline_request(Request::post(AIRLINE_PATH), airline, thumbnail)?)
            .await
    }

    /// PUT `/airline/{id}`
    pub async fn update_airline(
        &self,
        id: &str,
        airline: &AirlineForm,
        thumbnail: Option<FilePart>,
    ) -> Result<ApiResponse> {
        let request = Request::put(format!("{}/{}", AIRLINE_PATH, id));
        self.request(airline_request(request, airline, thumbnail)?)
            .await
    }

    /// DELETE `/airline/{id}`
    pub async fn delete_airline(&self, id: &str) -> Result<ApiResponse> {
        self.request(Request::delete(format!("{}/{}", AIRLINE_PATH, id)))
            .await
    }

    /// GET `/ticket`, with the filter attached as query parameters only when
    /// it is non-empty
    pub async fn tickets(&self, filter: Option<&Value>) -> Result<ApiResponse> {
        self.request(collection_request(TICKET_PATH, filter)?).await
    }

    /// GET `/ticket/{id}`
    pub async fn ticket(&self, id: &str) -> Result<ApiResponse> {
        self.request(Request::get(format!("{}/{}", TICKET_PATH, id)))
            .await
    }

    /// POST `/ticket`
    pub async fn create_ticket(&self, ticket: &TicketForm) -> Result<ApiResponse> {
        self.request(Request::post(TICKET_PATH).with_form(ticket)?)
            .await
    }

    /// PUT `/ticket/{id}`
    pub async fn update_ticket(&self, id: &str, ticket: &TicketForm) -> Result<ApiResponse> {
        self.request(Request::put(format!("{}/{}", TICKET_PATH, id)).with_form(ticket)?)
            .await
    }

    /// DELETE `/ticket/{id}`
    pub async fn delete_ticket(&self, id: &str) -> Result<ApiResponse> {
        self.request(Request::delete(format!("{}/{}", TICKET_PATH, id)))
            .await
    }
}

fn collection_request(path: &str, filter: Option<&Value>) -> Result<Request> {
    let mut request = Request::get(path);

    if let Some(filter) = filter {
        let pairs = to_pairs(filter)?;
        if !pairs.is_empty() {
            request = request.with_query_pairs(pairs);
        }
    }

    Ok(request)
}

/// Airlines upload as multipart when a thumbnail file is attached and as an
/// ordinary form body otherwise.
fn airline_request(
    base: Request,
    airline: &AirlineForm,
    thumbnail: Option<FilePart>,
) -> Result<Request> {
    match thumbnail {
        Some(mut file) => {
            file.name = THUMBNAIL_FIELD.to_string();
            let fields = text_fields(to_pairs(airline)?);
            Ok(base.with_multipart(fields, vec![file]))
        }
        None => base.with_form(airline),
    }
}

fn text_fields(pairs: Vec<(String, QueryValue)>) -> Vec<(String, String)> {
    let mut fields = Vec::with_capacity(pairs.len());

    for (key, value) in pairs {
        match value {
            QueryValue::One(v) => fields.push((key, v)),
            QueryValue::Many(values) => {
                let bracketed = format!("{}[]", key);
                for v in values {
                    fields.push((bracketed.clone(), v));
                }
            }
        }
    }

    fields
}
