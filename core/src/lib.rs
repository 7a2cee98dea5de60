//! Client core for the household registration service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and pairs them with a
//! `Transport` in `HouseholdApi` for callers that just want the data. The
//! `display` module turns backend enum codes into Vietnamese labels.
//!
//! # Design
//! - `HouseholdClient` is stateless: it holds only an `ApiConfig`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and testable.
//! - Payloads are validated before a request is built; nothing invalid
//!   reaches the wire.
//! - `ApiError`'s `Display` is the text a user sees. Backend messages pass
//!   through verbatim, transport trouble becomes a fixed connection message.

pub mod api;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::HouseholdApi;
pub use client::HouseholdClient;
pub use config::ApiConfig;
pub use display::{display_value, DisplayMap};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CreateHousehold, Household, LoginRequest, LoginResponse, NewResident, Resident,
    UpdateHousehold, UpdateResident,
};
