//! Stateless HTTP request builder and response parser for the household API.
//!
//! # Design
//! `HouseholdClient` holds only its `ApiConfig` and carries no mutable state
//! between calls. Every endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; both funnel through `build_request` / `parse_response` so
//! headers, body suppression and error extraction are identical everywhere.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateHousehold, Household, LoginRequest, LoginResponse, NewResident, Resident,
    UpdateHousehold, UpdateResident,
};

pub const HOUSEHOLD_PATH: &str = "/house-hold";
pub const MEMBERS_PATH: &str = "/house-hold/member";
pub const ADD_MEMBER_PATH: &str = "/house-hold/addmember";
pub const UPDATE_HOUSEHOLD_PATH: &str = "/house-hold/update";
pub const ADMIN_HOUSEHOLDS_PATH: &str = "/admin";
pub const LOGIN_PATH: &str = "/auth/login";

/// Synchronous, stateless client for the household API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. `HouseholdApi` pairs it with a transport.
#[derive(Debug, Clone)]
pub struct HouseholdClient {
    config: ApiConfig,
}

impl HouseholdClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build a request for `path` relative to the base URL.
    ///
    /// Always sends `content-type: application/json` and asks for
    /// credentials. `authorization` is set only when `token` is given. A body
    /// passed with `GET` is dropped.
    pub fn build_request<B>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let body = match body {
            Some(body) if method.allows_body() => Some(
                serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(HttpRequest {
            method,
            url: self.config.url(path),
            headers,
            body,
            include_credentials: true,
        })
    }

    /// Decode a response body, or turn a non-2xx status into `ApiError::Http`.
    ///
    /// An empty success body reads as JSON `null`.
    pub fn parse_response<T>(&self, response: HttpResponse) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        check_status(&response)?;
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            cause: e.to_string(),
        })
    }

    pub fn build_create_household(
        &self,
        input: &CreateHousehold,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        self.build_request(HOUSEHOLD_PATH, HttpMethod::Post, Some(input), token)
    }

    pub fn build_get_household(&self, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        self.build_request::<()>(HOUSEHOLD_PATH, HttpMethod::Get, None, token)
    }

    pub fn build_get_household_members(&self, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        self.build_request::<()>(MEMBERS_PATH, HttpMethod::Get, None, token)
    }

    pub fn build_add_household_member(
        &self,
        input: &NewResident,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        self.build_request(ADD_MEMBER_PATH, HttpMethod::Post, Some(input), token)
    }

    pub fn build_update_household_member(
        &self,
        resident_id: i64,
        input: &UpdateResident,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let path = format!("{MEMBERS_PATH}/{resident_id}");
        self.build_request(&path, HttpMethod::Patch, Some(input), token)
    }

    pub fn build_delete_household_member(
        &self,
        resident_id: i64,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("{MEMBERS_PATH}/{resident_id}");
        self.build_request::<()>(&path, HttpMethod::Delete, None, token)
    }

    pub fn build_update_household(
        &self,
        input: &UpdateHousehold,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        self.build_request(UPDATE_HOUSEHOLD_PATH, HttpMethod::Patch, Some(input), token)
    }

    /// Admin listing of every household.
    pub fn build_list_households(&self, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        self.build_request::<()>(ADMIN_HOUSEHOLDS_PATH, HttpMethod::Get, None, token)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        self.build_request(LOGIN_PATH, HttpMethod::Post, Some(input), None)
    }

    pub fn parse_household(&self, response: HttpResponse) -> Result<Household, ApiError> {
        self.parse_response(response)
    }

    pub fn parse_members(&self, response: HttpResponse) -> Result<Vec<Resident>, ApiError> {
        self.parse_response(response)
    }

    pub fn parse_resident(&self, response: HttpResponse) -> Result<Resident, ApiError> {
        self.parse_response(response)
    }

    pub fn parse_households(&self, response: HttpResponse) -> Result<Vec<Household>, ApiError> {
        self.parse_response(response)
    }

    /// Delete acknowledgements have no fixed shape; the body is returned as is.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_response(response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        self.parse_response(response)
    }
}

/// Map a non-2xx response to `ApiError::Http`, keeping the body's `message`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| error_message(&body));
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

/// `message` is usually a string; validation failures may send a list.
fn error_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
