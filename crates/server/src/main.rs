// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use despacho_api::{
    ApiError, ApiErrorCategory, BalanceStatsResponse, CreateWorkOrderRequest,
    CreateWorkOrderResponse, DispatchGuideUpdate, ListDispatchGuidesResponse,
    ListHandlersResponse, ListWorkOrdersResponse, UpdateDispatchGuidesRequest, UpdateResponse,
    UpdateWorkOrdersRequest, WorkOrderUpdate,
};
use despacho_persistence::{DispatchGuideData, Persistence, PersistenceError, WorkOrderData};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::SessionActor;

/// Despacho Server - HTTP server for the work order and dispatch guide engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "DESPACHO_DATABASE")]
    database: Option<String>,

    /// MySQL/MariaDB connection URL. Takes precedence over `--database`.
    #[arg(long, env = "DESPACHO_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "DESPACHO_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "DESPACHO_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,
}

/// Application state shared across handlers.
///
/// One connection serves every request; the mutex serializes them.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

/// Error body returned for every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Machine-readable code.
    error: String,
    /// Human-readable message.
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.code.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match (&err, err.category()) {
            (ApiError::AuthenticationFailed { .. }, _) => StatusCode::UNAUTHORIZED,
            (ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }, _) => {
                StatusCode::FORBIDDEN
            }
            (_, ApiErrorCategory::NotFound) => StatusCode::NOT_FOUND,
            (_, ApiErrorCategory::Internal) => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            (
                _,
                ApiErrorCategory::Validation | ApiErrorCategory::Conflict | ApiErrorCategory::Auth,
            ) => StatusCode::BAD_REQUEST,
        };

        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from(ApiError::invalid_input("body", rejection.body_text()))
    }
}

/// Handler for GET `/api/health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/api/work_orders`.
async fn handle_create_work_order(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    body: Result<Json<CreateWorkOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateWorkOrderResponse>), HttpError> {
    let Json(request) = body?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateWorkOrderResponse =
        despacho_api::create_work_order(&mut persistence, &actor, &request)?;
    drop(persistence);

    info!(
        ot_id = response.ot_id,
        guide_id = response.guide_id,
        "Work order created"
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/api/work_orders`.
async fn handle_list_work_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListWorkOrdersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::list_work_orders(&mut persistence, &actor)?))
}

/// Handler for GET `/api/work_orders/mine`.
async fn handle_list_my_work_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListWorkOrdersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::list_my_work_orders(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for GET `/api/work_orders/{ot_id}`.
async fn handle_get_work_order(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ot_id): Path<i64>,
) -> Result<Json<WorkOrderData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::get_work_order(
        &mut persistence,
        &actor,
        ot_id,
    )?))
}

/// Handler for PUT `/api/work_orders/{ot_id}`.
async fn handle_update_work_order(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ot_id): Path<i64>,
    body: Result<Json<WorkOrderUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, HttpError> {
    let Json(update) = body?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::update_work_order(
        &mut persistence,
        &actor,
        ot_id,
        update,
    )?))
}

/// Handler for PUT `/api/work_orders`.
async fn handle_update_work_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    body: Result<Json<UpdateWorkOrdersRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, HttpError> {
    let Json(request) = body?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::update_work_orders(
        &mut persistence,
        &actor,
        request,
    )?))
}

/// Handler for GET `/api/dispatch_guides`.
async fn handle_list_dispatch_guides(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListDispatchGuidesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::list_dispatch_guides(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for GET `/api/dispatch_guides/mine`.
async fn handle_list_my_dispatch_guides(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListDispatchGuidesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::list_my_dispatch_guides(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for GET `/api/dispatch_guides/{guide_id}`.
async fn handle_get_dispatch_guide(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(guide_id): Path<i64>,
) -> Result<Json<DispatchGuideData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::get_dispatch_guide(
        &mut persistence,
        &actor,
        guide_id,
    )?))
}

/// Handler for PUT `/api/dispatch_guides/{guide_id}`.
async fn handle_update_dispatch_guide(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(guide_id): Path<i64>,
    body: Result<Json<DispatchGuideUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, HttpError> {
    let Json(update) = body?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::update_dispatch_guide(
        &mut persistence,
        &actor,
        guide_id,
        update,
    )?))
}

/// Handler for PUT `/api/dispatch_guides`.
async fn handle_update_dispatch_guides(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    body: Result<Json<UpdateDispatchGuidesRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, HttpError> {
    let Json(request) = body?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::update_dispatch_guides(
        &mut persistence,
        &actor,
        request,
    )?))
}

/// Handler for GET `/api/balance_stats`.
async fn handle_balance_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<BalanceStatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::get_balance_stats(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for GET `/api/couriers/{company_id}/handlers`.
async fn handle_list_company_handlers(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(company_id): Path<i64>,
) -> Result<Json<ListHandlersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(despacho_api::list_company_handlers(
        &mut persistence,
        &actor,
        company_id,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route(
            "/api/work_orders",
            post(handle_create_work_order)
                .get(handle_list_work_orders)
                .put(handle_update_work_orders),
        )
        .route("/api/work_orders/mine", get(handle_list_my_work_orders))
        .route(
            "/api/work_orders/{ot_id}",
            get(handle_get_work_order).put(handle_update_work_order),
        )
        .route(
            "/api/dispatch_guides",
            get(handle_list_dispatch_guides).put(handle_update_dispatch_guides),
        )
        .route(
            "/api/dispatch_guides/mine",
            get(handle_list_my_dispatch_guides),
        )
        .route(
            "/api/dispatch_guides/{guide_id}",
            get(handle_get_dispatch_guide).put(handle_update_dispatch_guide),
        )
        .route("/api/balance_stats", get(handle_balance_stats))
        .route(
            "/api/couriers/{company_id}/handlers",
            get(handle_list_company_handlers),
        )
        .with_state(app_state)
}

fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Despacho Server");

    let persistence: Persistence = open_persistence(&args)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use despacho_api::AuthenticationService;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const HANDLER_ID: i64 = 801;

    /// A router over a seeded in-memory database, with one session per role.
    struct TestServer {
        app: Router,
        chief: String,
        picker: String,
        courier: String,
        order_id: i64,
    }

    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    async fn setup() -> TestServer {
        let app_state: AppState = create_test_app_state();
        let mut persistence = app_state.persistence.lock().await;

        let mut session_for = |role: &str, first: &str, last: Option<&str>| -> (i64, String) {
            let employee_id = persistence.insert_employee(role, first, last).unwrap();
            let session = AuthenticationService::issue_session(&mut persistence, employee_id)
                .unwrap();
            (employee_id, session.session_token)
        };
        let (_, chief) = session_for("JEFE_LOGISTICA", "Marta", Some("Soto"));
        let (_, picker) = session_for("EMPLEADO_LOGISTICA", "Pedro", Some("Lagos"));
        let (courier_id, courier) = session_for("TRANSPORTISTA", "Rapido Sur", None);

        persistence
            .register_handler(HANDLER_ID, courier_id, "Jose", "Mora")
            .unwrap();
        let order_id = persistence
            .insert_sales_order("Ana", Some("Rojas"), Some("Av. Matta 123"))
            .unwrap();
        drop(persistence);

        TestServer {
            app: build_router(app_state),
            chief,
            picker,
            courier,
            order_id,
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, value)
    }

    /// Creates the seeded order's work order, returning `(ot_id, guide_id)`.
    async fn create_work_order(server: &TestServer) -> (i64, i64) {
        let (status, body) = send(
            &server.app,
            "POST",
            "/api/work_orders",
            Some(&server.chief),
            Some(json!({ "order_id": server.order_id })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        (
            body["ot_id"].as_i64().unwrap(),
            body["guide_id"].as_i64().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_health_needs_no_session() {
        let server = setup().await;

        let (status, body) = send(&server.app, "GET", "/api/health", None, None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthenticated() {
        let server = setup().await;

        let (status, body) = send(&server.app, "GET", "/api/work_orders", None, None).await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthenticated() {
        let server = setup().await;

        let (status, body) = send(
            &server.app,
            "GET",
            "/api/balance_stats",
            Some("session_forged"),
            None,
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_unknown_role_is_unauthorized() {
        let app_state = create_test_app_state();
        let mut persistence = app_state.persistence.lock().await;
        let employee_id = persistence
            .insert_employee("VENDEDOR", "Sofia", Some("Pino"))
            .unwrap();
        let token = AuthenticationService::issue_session(&mut persistence, employee_id)
            .unwrap()
            .session_token;
        drop(persistence);
        let app = build_router(app_state);

        let (status, body) = send(&app, "GET", "/api/work_orders", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_work_order_then_duplicate() {
        let server = setup().await;
        let (ot_id, _) = create_work_order(&server).await;

        let (status, body) = send(
            &server.app,
            "POST",
            "/api/work_orders",
            Some(&server.chief),
            Some(json!({ "order_id": server.order_id })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "DUPLICATE");

        let (status, body) = send(
            &server.app,
            "GET",
            &format!("/api/work_orders/{ot_id}"),
            Some(&server.picker),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["state"], "ASSIGNED");
        assert_eq!(body["worker_name"], "Pedro Lagos");
    }

    #[tokio::test]
    async fn test_create_for_missing_order_is_not_found() {
        let server = setup().await;

        let (status, body) = send(
            &server.app,
            "POST",
            "/api/work_orders",
            Some(&server.chief),
            Some(json!({ "order_id": 9999 })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_input() {
        let server = setup().await;

        let (status, body) = send(
            &server.app,
            "POST",
            "/api/work_orders",
            Some(&server.chief),
            Some(json!({ "order": "PV-000001" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_guide_is_locked_until_work_order_completes() {
        let server = setup().await;
        let (_, guide_id) = create_work_order(&server).await;

        let (status, body) = send(
            &server.app,
            "PUT",
            &format!("/api/dispatch_guides/{guide_id}"),
            Some(&server.courier),
            Some(json!({ "handler_id": HANDLER_ID })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["error"], "OT_NOT_COMPLETED");
    }

    #[tokio::test]
    async fn test_picker_cannot_back_date_work_order() {
        let server = setup().await;
        let (ot_id, _) = create_work_order(&server).await;

        let (status, body) = send(
            &server.app,
            "PUT",
            &format!("/api/work_orders/{ot_id}"),
            Some(&server.picker),
            Some(json!({ "fecha": "2020-01-01" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_dispatch_flow_from_completion_to_assignment() {
        let server = setup().await;
        let (ot_id, guide_id) = create_work_order(&server).await;

        let (status, body) = send(
            &server.app,
            "PUT",
            "/api/work_orders",
            Some(&server.chief),
            Some(json!({ "updates": [ { "ot_id": ot_id, "estado": "COMPLETED" } ] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["updated_ids"], json!([ot_id]));

        let (status, body) = send(
            &server.app,
            "GET",
            &format!("/api/dispatch_guides/{guide_id}"),
            Some(&server.courier),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["state"], "POR_ASIGNAR");

        let (status, _) = send(
            &server.app,
            "PUT",
            &format!("/api/dispatch_guides/{guide_id}"),
            Some(&server.courier),
            Some(json!({ "handler_id": HANDLER_ID.to_string() })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            &server.app,
            "GET",
            "/api/dispatch_guides/mine",
            Some(&server.courier),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let guide = &body["dispatch_guides"][0];
        assert_eq!(guide["state"], "ASIGNADA");
        assert_eq!(guide["handler_id"], HANDLER_ID);
        assert!(guide["fecha"].is_string());
    }

    #[tokio::test]
    async fn test_clearing_handler_returns_guide_to_pool() {
        let server = setup().await;
        let (ot_id, guide_id) = create_work_order(&server).await;
        send(
            &server.app,
            "PUT",
            &format!("/api/work_orders/{ot_id}"),
            Some(&server.chief),
            Some(json!({ "estado": "COMPLETED" })),
        )
        .await;
        send(
            &server.app,
            "PUT",
            &format!("/api/dispatch_guides/{guide_id}"),
            Some(&server.courier),
            Some(json!({ "handler_id": HANDLER_ID })),
        )
        .await;

        let (status, _) = send(
            &server.app,
            "PUT",
            "/api/dispatch_guides",
            Some(&server.courier),
            Some(json!({ "updates": [ { "guide_id": guide_id, "handler_id": "" } ] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (_, body) = send(
            &server.app,
            "GET",
            &format!("/api/dispatch_guides/{guide_id}"),
            Some(&server.chief),
            None,
        )
        .await;
        assert_eq!(body["state"], "POR_ASIGNAR");
        assert!(body["handler_id"].is_null());
    }

    #[tokio::test]
    async fn test_balance_stats_and_handlers_are_listed() {
        let server = setup().await;
        create_work_order(&server).await;

        let (status, body) = send(
            &server.app,
            "GET",
            "/api/balance_stats",
            Some(&server.chief),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["workers"][0]["pending"], 1);
        assert_eq!(body["couriers"][0]["pending"], 1);

        let (_, guides) = send(
            &server.app,
            "GET",
            "/api/dispatch_guides",
            Some(&server.chief),
            None,
        )
        .await;
        let courier_id = guides["dispatch_guides"][0]["courier_id"].as_i64().unwrap();

        let (status, body) = send(
            &server.app,
            "GET",
            &format!("/api/couriers/{courier_id}/handlers"),
            Some(&server.chief),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["handlers"][0]["handler_id"], HANDLER_ID);
    }
}
