use serde::{Deserialize, Serialize};

/// Login credentials for the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payload for creating or updating an airline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirlineForm {
    pub title: String,
    pub airport: String,
}

/// Payload for creating or updating a ticket.
///
/// Field names follow the backend's wire format, including its spelling of
/// `arival`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketForm {
    pub origin: String,
    pub departure: String,
    #[serde(rename = "arival")]
    pub arrival: String,
    pub place_from: String,
    pub place_to: String,
    pub country_from: String,
    pub country_to: String,
    pub transit: String,
    pub price: u64,
    pub stock: u32,
    #[serde(rename = "airlineId")]
    pub airline_id: String,
}
