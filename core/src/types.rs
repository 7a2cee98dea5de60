//! Request and response records for the household API.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Response records keep
//! fields they don't model in `extra`, so a household or resident passes
//! through unchanged even when the backend adds columns. Request payloads
//! carry a `validate` method that the client runs before building a request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::display::{self, DisplayMap};
use crate::error::ApiError;

/// A registered household as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Resident>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A resident registered under a household.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for a new household together with its head resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHousehold {
    pub name: String,
    pub address: String,
    pub head: NewResident,
}

impl CreateHousehold {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)?;
        self.head.validate()
    }
}

/// Payload for a resident being added to a household.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence_status: Option<String>,
}

impl NewResident {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        check_resident_fields(
            self.gender.as_deref(),
            self.relationship.as_deref(),
            self.residence_status.as_deref(),
            self.id_card_number.as_deref(),
        )
    }
}

/// Partial update of a resident. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResident {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence_status: Option<String>,
}

impl UpdateResident {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        check_resident_fields(
            self.gender.as_deref(),
            self.relationship.as_deref(),
            self.residence_status.as_deref(),
            self.id_card_number.as_deref(),
        )
    }
}

/// Partial update of the household's own fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHousehold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UpdateHousehold {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(address) = &self.address {
            require_text("address", address)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("username", &self.username)?;
        require_text("password", &self.password)
    }
}

/// Session issued by `/auth/login`. The refresh token travels separately as
/// an HttpOnly cookie and never appears here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn require_text(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(field, "must not be blank"));
    }
    Ok(())
}

fn require_code(field: &'static str, value: Option<&str>, map: &DisplayMap) -> Result<(), ApiError> {
    match value {
        Some(code) if !map.contains(code) => Err(ApiError::invalid(
            field,
            format!("unknown {} code `{code}`", map.name()),
        )),
        _ => Ok(()),
    }
}

/// CMND numbers have 9 digits, CCCD numbers 12.
fn require_id_card(value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(number)
            if !matches!(number.len(), 9 | 12) || !number.bytes().all(|b| b.is_ascii_digit()) =>
        {
            Err(ApiError::invalid("idCardNumber", "must be 9 or 12 digits"))
        }
        _ => Ok(()),
    }
}

fn check_resident_fields(
    gender: Option<&str>,
    relationship: Option<&str>,
    residence_status: Option<&str>,
    id_card_number: Option<&str>,
) -> Result<(), ApiError> {
    require_code("gender", gender, &display::GENDER)?;
    require_code("relationship", relationship, &display::RELATIONSHIP)?;
    require_code("residenceStatus", residence_status, &display::RESIDENCE_STATUS)?;
    require_id_card(id_card_number)
}
