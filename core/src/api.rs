//! One call per backend operation: build, execute, parse.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::HouseholdClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CreateHousehold, Household, LoginRequest, LoginResponse, NewResident, Resident,
    UpdateHousehold, UpdateResident,
};

/// `HouseholdClient` paired with a `Transport`.
///
/// Every method makes exactly one attempt and hands any failure straight
/// back to the caller.
#[derive(Clone)]
pub struct HouseholdApi<T = UreqTransport> {
    client: HouseholdClient,
    transport: T,
}

impl HouseholdApi<UreqTransport> {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Configured from `NEXT_PUBLIC_API_URL`.
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }
}

impl<T: Transport> HouseholdApi<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self {
            client: HouseholdClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &HouseholdClient {
        &self.client
    }

    /// Send a JSON request to `path` and decode the JSON answer.
    pub fn api_request<B, R>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.build_request(path, method, body, token)?;
        self.send(request)
    }

    pub fn create_household(
        &self,
        input: &CreateHousehold,
        token: Option<&str>,
    ) -> Result<Household, ApiError> {
        self.send(self.client.build_create_household(input, token)?)
    }

    pub fn get_household(&self, token: Option<&str>) -> Result<Household, ApiError> {
        self.send(self.client.build_get_household(token)?)
    }

    pub fn get_household_members(&self, token: Option<&str>) -> Result<Vec<Resident>, ApiError> {
        self.send(self.client.build_get_household_members(token)?)
    }

    pub fn add_household_member(
        &self,
        input: &NewResident,
        token: Option<&str>,
    ) -> Result<Resident, ApiError> {
        self.send(self.client.build_add_household_member(input, token)?)
    }

    pub fn update_household_member(
        &self,
        resident_id: i64,
        input: &UpdateResident,
        token: Option<&str>,
    ) -> Result<Resident, ApiError> {
        self.send(
            self.client
                .build_update_household_member(resident_id, input, token)?,
        )
    }

    pub fn delete_household_member(
        &self,
        resident_id: i64,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.send(self.client.build_delete_household_member(resident_id, token)?)
    }

    pub fn update_household(
        &self,
        input: &UpdateHousehold,
        token: Option<&str>,
    ) -> Result<Household, ApiError> {
        self.send(self.client.build_update_household(input, token)?)
    }

    /// Every household, for the admin dashboard.
    pub fn list_households(&self, token: Option<&str>) -> Result<Vec<Household>, ApiError> {
        self.send(self.client.build_list_households(token)?)
    }

    /// Start a session. The backend also sets the refresh-token cookie, which
    /// the transport keeps for later calls.
    pub fn login(&self, input: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(self.client.build_login(input)?)
    }

    /// Execute a request built by `client()` and decode its JSON answer.
    pub fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(&request).inspect_err(|err| {
            if let ApiError::Network { cause } = err {
                warn!(method = request.method.as_str(), url = %request.url, %cause, "no response from backend");
            }
        })?;
        self.client.parse_response(response).inspect_err(|err| match err {
            ApiError::Http { status, .. } => {
                debug!(status, url = %request.url, error = %err, "backend rejected request");
            }
            ApiError::Decode { cause } => {
                warn!(url = %request.url, %cause, "unreadable response body");
            }
            _ => {}
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::error::{CONNECTION_FAILED, REQUEST_FAILED};
    use crate::http::HttpResponse;

    /// Answers every request with a canned response and records what it saw.
    struct Scripted {
        answer: Result<(u16, &'static str), &'static str>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn ok(status: u16, body: &'static str) -> Self {
            Self {
                answer: Ok((status, body)),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                answer: Err("connection refused"),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            match self.answer {
                Ok((status, body)) => Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                Err(cause) => Err(ApiError::Network {
                    cause: cause.to_string(),
                }),
            }
        }
    }

    fn api(transport: &Scripted) -> HouseholdApi<&Scripted> {
        HouseholdApi::with_transport(ApiConfig::new("http://localhost:3000"), transport)
    }

    #[test]
    fn api_request_passes_success_body_through() {
        let transport = Scripted::ok(200, r#"{"id":1,"name":"Household A"}"#);
        let value: Value = api(&transport)
            .api_request::<(), _>("/house-hold", HttpMethod::Get, None, Some("tok"))
            .unwrap();
        assert_eq!(value, json!({"id": 1, "name": "Household A"}));

        let sent = transport.last();
        assert_eq!(sent.url, "http://localhost:3000/house-hold");
        assert_eq!(sent.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn update_member_sends_documented_request() {
        let transport = Scripted::ok(200, r#"{"id":42,"name":"X"}"#);
        let input = UpdateResident {
            name: Some("X".to_string()),
            ..UpdateResident::default()
        };
        let resident = api(&transport)
            .update_household_member(42, &input, Some("tok"))
            .unwrap();
        assert_eq!(resident.id, 42);

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, "http://localhost:3000/house-hold/member/42");
        assert_eq!(sent.body.as_deref(), Some(r#"{"name":"X"}"#));
        assert_eq!(sent.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn backend_message_reaches_the_caller() {
        let transport = Scripted::ok(401, r#"{"message":"Invalid token"}"#);
        let err = api(&transport).get_household(Some("stale")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn missing_message_falls_back() {
        let transport = Scripted::ok(500, "{}");
        let err = api(&transport).list_households(None).unwrap_err();
        assert_eq!(err.to_string(), REQUEST_FAILED);
    }

    #[test]
    fn unreachable_backend_reports_connection_error() {
        let transport = Scripted::unreachable();
        let err = api(&transport).get_household_members(None).unwrap_err();
        assert_eq!(err.to_string(), CONNECTION_FAILED);
        assert_eq!(transport.seen.borrow().len(), 1, "exactly one attempt");
    }

    #[test]
    fn validation_failure_sends_nothing() {
        let transport = Scripted::ok(200, "{}");
        let input = UpdateHousehold {
            name: Some(String::new()),
            address: None,
        };
        let err = api(&transport).update_household(&input, None).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert!(transport.seen.borrow().is_empty());
    }

    #[test]
    fn delete_returns_acknowledgement() {
        let transport = Scripted::ok(200, r#"{"message":"Đã xóa nhân khẩu"}"#);
        let ack = api(&transport).delete_household_member(3, Some("tok")).unwrap();
        assert_eq!(ack["message"], "Đã xóa nhân khẩu");
        assert!(transport.last().body.is_none());
    }

    #[test]
    fn send_as_value_keeps_nulls_and_empty_lists() {
        let body = r#"{"id":1,"name":null,"members":[],"status":"ACTIVE"}"#;
        let transport = Scripted::ok(200, body);
        let api = api(&transport);
        let request = api.client().build_get_household(Some("tok")).unwrap();
        let value: Value = api.send(request).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(body).unwrap());
        assert!(value["name"].is_null());
        assert_eq!(value["members"], json!([]));
    }
}
