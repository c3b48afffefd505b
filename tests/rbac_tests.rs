//! RBAC integration tests: identity resolution from the x-user header and
//! the role/resource gates. These exercise positive and negative paths by
//! calling the public handlers directly with a fresh state per test.

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use ledgerd::identity::{self, Role, USER_HEADER};
use ledgerd::server::{self, AppState, RolePayload};

fn headers_for(user: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_HEADER, user.parse().unwrap());
    headers
}

#[tokio::test]
async fn missing_identity_is_unauthenticated_everywhere() -> Result<()> {
    let state = AppState::new();
    let empty = HeaderMap::new();

    let err = server::admin_ping(State(state.clone()), empty.clone()).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    let err = server::client_ping(State(state.clone()), empty.clone()).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    let err = server::list_clients(State(state.clone()), empty.clone()).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    let err = server::get_client(State(state.clone()), empty.clone(), Path(1)).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    let err = server::client_summary(State(state), empty, Path(1)).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    Ok(())
}

#[tokio::test]
async fn unknown_username_is_unauthenticated() -> Result<()> {
    let state = AppState::new();
    let err = server::client_ping(State(state), headers_for("ghost")).await.unwrap_err();
    assert_eq!(err.http_status(), 401);
    Ok(())
}

#[tokio::test]
async fn admin_ping_allows_admin_and_forbids_client() -> Result<()> {
    let state = AppState::new();
    state.registry.assign("bob", Role::Client);

    let resp = server::admin_ping(State(state.clone()), headers_for("admin")).await?;
    assert_eq!(resp.0.status, "admin pong");

    // Same request from a client-role caller: authenticated, but forbidden.
    let err = server::admin_ping(State(state), headers_for("bob")).await.unwrap_err();
    assert_eq!(err.http_status(), 403);
    Ok(())
}

#[tokio::test]
async fn accountant_ping_role_gate_matrix() -> Result<()> {
    let state = AppState::new();
    state.registry.assign("ac", Role::Accountant);
    state.registry.assign("bk", Role::Bookkeeper);
    state.registry.assign("cl", Role::Client);

    assert!(server::accountant_ping(State(state.clone()), headers_for("admin")).await.is_ok());
    assert!(server::accountant_ping(State(state.clone()), headers_for("ac")).await.is_ok());

    let err = server::accountant_ping(State(state.clone()), headers_for("bk")).await.unwrap_err();
    assert_eq!(err.http_status(), 403);
    let err = server::accountant_ping(State(state), headers_for("cl")).await.unwrap_err();
    assert_eq!(err.http_status(), 403);
    Ok(())
}

#[tokio::test]
async fn client_role_cannot_create_clients() -> Result<()> {
    let state = AppState::new();
    state.registry.assign("cl", Role::Client);

    let payload = server::ClientCreate {
        username: "someone".to_string(),
        name: "Someone".to_string(),
        bookkeeper: None,
        accountant: None,
    };
    let err = server::create_client(State(state), headers_for("cl"), axum::Json(payload))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 403);
    Ok(())
}

#[tokio::test]
async fn role_assignment_round_trip() -> Result<()> {
    let state = AppState::new();

    // Assign via the admin endpoint...
    let resp = server::set_user_role(
        State(state.clone()),
        headers_for("admin"),
        Path("carla".to_string()),
        axum::Json(RolePayload { role: "accountant".to_string() }),
    )
    .await?;
    assert_eq!(resp.0.username, "carla");
    assert_eq!(resp.0.role, Role::Accountant);

    // ...observe it in the listing...
    let users = server::list_users(State(state.clone()), headers_for("admin")).await?;
    assert!(users.0.users.iter().any(|u| u.username == "carla" && u.role == Role::Accountant));

    // ...and through the resolver for that username.
    let principal = identity::resolve_identity(&state.registry, &headers_for("carla"))?;
    assert_eq!(principal.role, Role::Accountant);
    Ok(())
}

#[tokio::test]
async fn role_assignment_is_idempotent() -> Result<()> {
    let state = AppState::new();
    for _ in 0..2 {
        server::set_user_role(
            State(state.clone()),
            headers_for("admin"),
            Path("bk".to_string()),
            axum::Json(RolePayload { role: "bookkeeper".to_string() }),
        )
        .await?;
    }
    let users = server::list_users(State(state), headers_for("admin")).await?;
    let matches = users.0.users.iter().filter(|u| u.username == "bk").count();
    assert_eq!(matches, 1);
    Ok(())
}

#[tokio::test]
async fn unknown_role_string_is_bad_request() -> Result<()> {
    let state = AppState::new();
    let err = server::set_user_role(
        State(state),
        headers_for("admin"),
        Path("bob".to_string()),
        axum::Json(RolePayload { role: "wizard".to_string() }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.http_status(), 400);
    Ok(())
}

#[tokio::test]
async fn role_listing_requires_admin() -> Result<()> {
    let state = AppState::new();
    state.registry.assign("bk", Role::Bookkeeper);
    let err = server::list_users(State(state), headers_for("bk")).await.unwrap_err();
    assert_eq!(err.http_status(), 403);
    Ok(())
}
