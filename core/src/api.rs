//! HTTP lookup endpoints over the address directory.
//!
//! - `GET /address?ip=<ip>` or `GET /address?mac=<mac>`: one address. `mac`
//!   wins when both are given.
//! - `GET /address-book`: every address, ascending by id.

pub mod error;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use addrbook_common::{Address, AddressRepository};

pub use error::{ApiError, ApiResult};

pub type SharedRepository = Arc<dyn AddressRepository>;

#[derive(Debug, Default, Deserialize)]
pub struct AddressQuery {
    pub ip: Option<String>,
    pub mac: Option<String>,
}

pub fn create_router(repository: SharedRepository) -> Router {
    Router::new()
        .route("/address", get(get_address))
        .route("/address-book", get(get_address_book))
        .with_state(repository)
}

#[tracing::instrument(skip(repository))]
pub async fn get_address(
    State(repository): State<SharedRepository>,
    Query(query): Query<AddressQuery>,
) -> ApiResult<Json<Address>> {
    let found: Option<Address> = match (&query.mac, &query.ip) {
        (Some(mac), _) => repository.find_by_mac(mac)?,
        (None, Some(ip)) => repository.find_by_ip(ip)?,
        (None, None) => return Err(ApiError::MissingQuery),
    };
    found.map(Json).ok_or(ApiError::NotFound)
}

pub async fn get_address_book(
    State(repository): State<SharedRepository>,
) -> ApiResult<Json<Vec<Address>>> {
    Ok(Json(repository.list_all()?))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
