//!
//! ledgerd HTTP server
//! -------------------
//! This module defines the Axum-based HTTP API for the bookkeeping service.
//!
//! Responsibilities:
//! - Caller identity resolution from the `x-user` header; roles always come
//!   from the role registry, never from the request.
//! - Role gate and per-client resource gate in front of every client-scoped
//!   endpoint, in a fixed order: resolve (401), role gate (403), record
//!   lookup (404), ownership (403).
//! - CRUD endpoints over the in-memory store plus the financial summary.
//! - Admin role management and a localized greeting endpoint.

use std::net::SocketAddr;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::identity::{self, Principal, Role, RoleRegistry};
use crate::storage::{Client, Note, SharedStore, Transaction, TransactionKind};
use crate::summary::{self, Summary};

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Accountant, Role::Bookkeeper, Role::Client];

/// Shared server state injected into all handlers.
///
/// Holds the store handle and the role registry. Both are cheap clones of
/// `Arc`-backed state, so tests build a fresh `AppState` per case.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub registry: RoleRegistry,
}

impl AppState {
    pub fn new() -> Self {
        Self { store: SharedStore::new(), registry: RoleRegistry::new() }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Resolve the caller and apply the role gate. Authentication errors always
/// surface before authorization errors because resolution runs first.
fn authorize(state: &AppState, headers: &HeaderMap, allowed: &[Role]) -> AppResult<Principal> {
    let principal = identity::resolve_identity(&state.registry, headers)?;
    identity::require_role(&principal, allowed)?;
    Ok(principal)
}

#[derive(Debug, Deserialize)]
pub struct GreetingParams {
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: String,
    pub dir: &'static str,
}

/// Localized greeting; the only endpoint with no identity requirement.
pub async fn greeting(Query(params): Query<GreetingParams>) -> Json<Greeting> {
    Json(Greeting {
        message: i18n::translate("greeting", &params.lang).to_string(),
        dir: i18n::direction(&params.lang),
    })
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
}

pub async fn admin_ping(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<PingResponse>> {
    authorize(&state, &headers, &[Role::Admin])?;
    Ok(Json(PingResponse { status: "admin pong" }))
}

pub async fn accountant_ping(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<PingResponse>> {
    authorize(&state, &headers, &[Role::Admin, Role::Accountant])?;
    Ok(Json(PingResponse { status: "accountant pong" }))
}

pub async fn client_ping(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<PingResponse>> {
    authorize(&state, &headers, ALL_ROLES)?;
    Ok(Json(PingResponse { status: "client pong" }))
}

#[derive(Debug, PartialEq, Serialize)]
pub struct UserEntry {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserEntry>,
}

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<UserList>> {
    authorize(&state, &headers, &[Role::Admin])?;
    let users = state
        .registry
        .list()
        .into_iter()
        .map(|(username, role)| UserEntry { username, role })
        .collect();
    Ok(Json(UserList { users }))
}

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub role: String,
}

/// Admin role assignment. The role arrives as a string so an unknown value
/// maps to 400 rather than a generic body-deserialization rejection.
pub async fn set_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(payload): Json<RolePayload>,
) -> AppResult<Json<UserEntry>> {
    authorize(&state, &headers, &[Role::Admin])?;
    let role = identity::parse_role(&payload.role)?;
    state.registry.assign(&username, role);
    Ok(Json(UserEntry { username, role }))
}

#[derive(Debug, Deserialize)]
pub struct ClientCreate {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bookkeeper: Option<String>,
    #[serde(default)]
    pub accountant: Option<String>,
}

pub async fn create_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    authorize(&state, &headers, &[Role::Admin, Role::Accountant, Role::Bookkeeper])?;
    let client = state.store.0.write().create_client(
        payload.username,
        payload.name,
        payload.bookkeeper,
        payload.accountant,
    );
    // New client usernames default to the client role unless already mapped.
    state.registry.register_client(&client.username);
    info!(target: "ledgerd::server", "client created: id={} username='{}'", client.id, client.username);
    Ok(Json(client))
}

#[derive(Debug, Serialize)]
pub struct ClientList {
    pub clients: Vec<Client>,
}

pub async fn list_clients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ClientList>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    // O(n) full scan filtered by the same predicate as the resource gate.
    let clients = state
        .store
        .0
        .read()
        .list_clients()
        .into_iter()
        .filter(|c| identity::can_access(c, &principal))
        .collect();
    Ok(Json(ClientList { clients }))
}

pub async fn get_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<Client>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    Ok(Json(client))
}

#[derive(Debug, Deserialize)]
pub struct NoteCreate {
    pub text: String,
}

pub async fn add_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<NoteCreate>,
) -> AppResult<Json<Note>> {
    let principal = authorize(&state, &headers, &[Role::Accountant, Role::Bookkeeper])?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    let note = state.store.0.write().add_note(id, principal.username, payload.text);
    Ok(Json(note))
}

#[derive(Debug, Serialize)]
pub struct NoteList {
    pub notes: Vec<Note>,
}

pub async fn list_notes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<NoteList>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    Ok(Json(NoteList { notes: state.store.0.read().notes(id) }))
}

#[derive(Debug, Deserialize)]
pub struct TransactionCreate {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

pub async fn add_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<TransactionCreate>,
) -> AppResult<Json<Transaction>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    if payload.amount < 0.0 {
        return Err(AppError::user("negative_amount", "transaction amount must be non-negative"));
    }
    let tx = state.store.0.write().add_transaction(
        id,
        payload.kind,
        payload.amount,
        payload.category,
        payload.date,
    );
    Ok(Json(tx))
}

#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<TransactionList>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    Ok(Json(TransactionList { transactions: state.store.0.read().transactions(id) }))
}

pub async fn client_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<Summary>> {
    let principal = authorize(&state, &headers, ALL_ROLES)?;
    let client = state.store.0.read().get_client(id)?;
    identity::ensure_client_access(&client, &principal)?;
    let txs = state.store.0.read().transactions(id);
    Ok(Json(summary::summarize(&txs)))
}

/// Build the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ledgerd ok" }))
        .route("/greeting", get(greeting))
        .route("/admin/ping", get(admin_ping))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{username}", put(set_user_role))
        .route("/accountant/ping", get(accountant_ping))
        .route("/client/ping", get(client_ping))
        .route("/clients", post(create_client).get(list_clients))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}/notes", post(add_note).get(list_notes))
        .route("/clients/{id}/transactions", post(add_transaction).get(list_transactions))
        .route("/clients/{id}/summary", get(client_summary))
        .with_state(state)
}

/// Start the ledgerd HTTP server bound to the given port.
///
/// The role registry is seeded with the bootstrap admin before the listener
/// binds, so the invariant that an admin mapping exists holds for every
/// request served.
pub async fn run_with_port(http_port: u16) -> anyhow::Result<()> {
    let state = AppState::new();
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Convenience entry point using the default port.
pub async fn run() -> anyhow::Result<()> {
    run_with_port(7878).await
}
