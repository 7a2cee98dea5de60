//! In-memory stand-in for the household registration backend.
//!
//! Implements the same REST contract as the production service: bearer or
//! refresh-cookie authentication, one household per account, `{ "message" }`
//! error bodies, and an admin-only listing.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
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
    pub information_status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub status: String,
    pub members: Vec<Resident>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub relationship: Option<String>,
    pub id_card_number: Option<String>,
    pub occupation: Option<String>,
    pub residence_status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateHousehold {
    pub name: String,
    pub address: String,
    pub head: MemberInput,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub relationship: Option<String>,
    pub id_card_number: Option<String>,
    pub occupation: Option<String>,
    pub residence_status: Option<String>,
}

#[derive(Deserialize)]
pub struct HouseholdPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

struct Account {
    password: &'static str,
    role: &'static str,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<&'static str, Account>,
    /// Token to username. Each account holds at most one session.
    access_tokens: HashMap<String, String>,
    refresh_tokens: HashMap<String, String>,
    households: HashMap<String, Household>,
    next_id: i64,
}

impl Store {
    /// Store seeded with one account per dashboard role.
    pub fn seeded() -> Self {
        let mut store = Store {
            next_id: 1,
            ..Store::default()
        };
        for (username, password, role) in [
            ("resident", "resident123", "RESIDENT"),
            ("admin", "admin123", "ADMIN"),
            ("accountant", "accountant123", "ACCOUNTANT"),
        ] {
            store.accounts.insert(username, Account { password, role });
        }
        store
    }

    fn end_sessions(&mut self, username: &str) {
        self.access_tokens.retain(|_, owner| *owner != username);
        self.refresh_tokens.retain(|_, owner| *owner != username);
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// A failed request: status plus the `{ "message" }` body the client surfaces.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, axum::Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// `axum::extract::Path` whose rejections use the `{ "message" }` error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiFailure))]
pub struct Path<T>(pub T);

/// `axum::Json` whose rejections use the `{ "message" }` error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiFailure))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

type ApiResult<T> = Result<T, ApiFailure>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/house-hold", get(get_household).post(create_household))
        .route("/house-hold/member", get(list_members))
        .route("/house-hold/addmember", post(add_member))
        .route("/house-hold/member/{id}", patch(update_member).delete(delete_member))
        .route("/house-hold/update", patch(update_household))
        .route("/admin", get(list_households))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock household backend listening");
    }
    axum::serve(listener, app()).await
}

/// Resolve the caller from `Authorization: Bearer` or, failing that, the
/// refresh-token cookie.
fn authenticate(store: &Store, headers: &HeaderMap) -> ApiResult<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid token"))?;
        return store
            .access_tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid token"));
    }
    refresh_cookie(headers)
        .and_then(|token| store.refresh_tokens.get(token).cloned())
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

fn refresh_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == REFRESH_COOKIE)
        .map(|(_, value)| value)
}

fn household_of<'a>(store: &'a mut Store, username: &str) -> ApiResult<&'a mut Household> {
    store
        .households
        .get_mut(username)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Chưa đăng ký hộ khẩu"))
}

fn new_resident(id: i64, input: MemberInput) -> Resident {
    Resident {
        id,
        name: input.name,
        date_of_birth: input.date_of_birth,
        gender: input.gender,
        relationship: input.relationship,
        id_card_number: input.id_card_number,
        occupation: input.occupation,
        residence_status: input.residence_status.or_else(|| Some("PERMANENT".to_string())),
        information_status: "PENDING".to_string(),
    }
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> ApiResult<impl IntoResponse> {
    let mut store = db.write().await;
    let role = match store.accounts.get(input.username.as_str()) {
        Some(account) if account.password == input.password => account.role,
        _ => {
            return Err(ApiFailure::new(
                StatusCode::UNAUTHORIZED,
                "Sai tên đăng nhập hoặc mật khẩu",
            ))
        }
    };
    store.end_sessions(&input.username);
    let access = Uuid::new_v4().to_string();
    let refresh = Uuid::new_v4().to_string();
    store.access_tokens.insert(access.clone(), input.username.clone());
    store.refresh_tokens.insert(refresh.clone(), input.username.clone());
    debug!(username = %input.username, role, "session issued");

    let cookie = format!("{REFRESH_COOKIE}={refresh}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "accessToken": access, "role": role })),
    ))
}

async fn create_household(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateHousehold>,
) -> ApiResult<(StatusCode, Json<Household>)> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    if store.households.contains_key(&username) {
        return Err(ApiFailure::new(StatusCode::CONFLICT, "Hộ khẩu đã tồn tại"));
    }
    if input.name.trim().is_empty() || input.head.name.trim().is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Thiếu thông tin bắt buộc"));
    }
    let household_id = store.next_id();
    let head_id = store.next_id();
    let mut head = new_resident(head_id, input.head);
    head.relationship = Some("HEAD".to_string());
    let household = Household {
        id: household_id,
        name: input.name,
        address: input.address,
        status: "PENDING".to_string(),
        members: vec![head],
    };
    store.households.insert(username, household.clone());
    Ok((StatusCode::CREATED, Json(household)))
}

async fn get_household(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Household>> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    household_of(&mut store, &username).map(|h| Json(h.clone()))
}

async fn list_members(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Resident>>> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    household_of(&mut store, &username).map(|h| Json(h.members.clone()))
}

async fn add_member(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<MemberInput>,
) -> ApiResult<(StatusCode, Json<Resident>)> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    if input.relationship.as_deref() == Some("HEAD") {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Hộ khẩu đã có chủ hộ"));
    }
    let id = store.next_id();
    let household = household_of(&mut store, &username)?;
    let resident = new_resident(id, input);
    household.members.push(resident.clone());
    Ok((StatusCode::CREATED, Json(resident)))
}

async fn update_member(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<MemberPatch>,
) -> ApiResult<Json<Resident>> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    let household = household_of(&mut store, &username)?;
    let member = household
        .members
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Không tìm thấy nhân khẩu"))?;
    if let Some(name) = input.name {
        member.name = name;
    }
    if input.date_of_birth.is_some() {
        member.date_of_birth = input.date_of_birth;
    }
    if input.gender.is_some() {
        member.gender = input.gender;
    }
    if input.relationship.is_some() && member.relationship.as_deref() != Some("HEAD") {
        member.relationship = input.relationship;
    }
    if input.id_card_number.is_some() {
        member.id_card_number = input.id_card_number;
    }
    if input.occupation.is_some() {
        member.occupation = input.occupation;
    }
    if input.residence_status.is_some() {
        member.residence_status = input.residence_status;
    }
    Ok(Json(member.clone()))
}

async fn delete_member(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    let household = household_of(&mut store, &username)?;
    let index = household
        .members
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Không tìm thấy nhân khẩu"))?;
    if household.members[index].relationship.as_deref() == Some("HEAD") {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Không thể xóa chủ hộ"));
    }
    household.members.remove(index);
    Ok(Json(json!({ "message": "Đã xóa nhân khẩu" })))
}

async fn update_household(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<HouseholdPatch>,
) -> ApiResult<Json<Household>> {
    let mut store = db.write().await;
    let username = authenticate(&store, &headers)?;
    let household = household_of(&mut store, &username)?;
    if let Some(name) = input.name {
        household.name = name;
    }
    if let Some(address) = input.address {
        household.address = address;
    }
    Ok(Json(household.clone()))
}

async fn list_households(
    State(db): State<Db>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Household>>> {
    let store = db.read().await;
    let username = authenticate(&store, &headers)?;
    let is_admin = store
        .accounts
        .get(username.as_str())
        .is_some_and(|account| account.role == "ADMIN");
    if !is_admin {
        return Err(ApiFailure::new(StatusCode::FORBIDDEN, "Forbidden"));
    }
    let mut households: Vec<Household> = store.households.values().cloned().collect();
    households.sort_by_key(|h| h.id);
    Ok(Json(households))
}
