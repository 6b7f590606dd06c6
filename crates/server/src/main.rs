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

mod actor;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use legaltrack_api::{
    ActivateAccountRequest, AddRemarkRequest, ApiError, AuditLogResponse, CaseActionRequest,
    CaseDetailResponse, CaseLocator, CreateDraftRequest, CreateStaffRequest, CreateStaffResponse,
    DEFAULT_ALLOCATION_ATTEMPTS, FeedbackRequest, FeedbackResponse, ListCasesResponse,
    ListExaminersResponse, ListStaffResponse, LoginEventRequest, Notifier, RecordDocumentRequest,
    RequestContext, StaffStatusResponse, TimelineResponse, TrackingResponse, TracingNotifier,
    TransitionCode, TransitionResponse, UpdateDraftRequest, UpdateStaffRequest, WorkflowConfig,
    WriteResponse, activate_account, add_remark, bootstrap_super_admin, create_draft,
    create_staff, deactivate_staff, delete_draft, finalize_draft, get_case, get_case_history,
    list_audit_log, list_cases, list_examiners, list_staff, perform_case_action,
    reactivate_staff, record_document, record_login_event, resend_activation, submit_feedback,
    track_case, update_draft, update_staff,
};
use legaltrack_domain::{DEFAULT_TRACKING_WIDTH, StaffActor};
use legaltrack_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::actor::{CurrentActor, IdentityCollaborator, OptionalActor};

/// LegalTrack Server - HTTP server for the LegalTrack case workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Office time zone used to bucket tracking IDs by month
    #[arg(long, default_value = "Asia/Manila")]
    timezone: String,

    /// Digits in the monthly tracking sequence
    #[arg(long, default_value_t = DEFAULT_TRACKING_WIDTH)]
    tracking_width: u8,

    /// Attempts before identifier allocation gives up
    #[arg(long, default_value_t = DEFAULT_ALLOCATION_ATTEMPTS)]
    allocation_attempts: u32,

    /// Email of the Super Admin to create if none exists yet
    #[arg(long)]
    bootstrap_admin_email: Option<String>,

    /// Full name for the bootstrapped Super Admin
    #[arg(long, default_value = "Super Admin")]
    bootstrap_admin_name: String,

    /// Shared token the identity collaborator presents on `/auth/events`.
    /// Without it that endpoint rejects every call.
    #[arg(long)]
    identity_token: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; each request holds it for the
/// length of its transaction.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    config: WorkflowConfig,
    notifier: Arc<dyn Notifier>,
    identity_token: Option<Arc<str>>,
}

#[derive(Debug, Deserialize)]
struct ListCasesQuery {
    tab: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuditLogQuery {
    action: Option<String>,
    limit: Option<i64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Response code, e.g. `INVALID_STATE`.
    code: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    code: TransitionCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code.as_str().to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code: TransitionCode = err.code();
        let status: StatusCode = match (&err, code) {
            (ApiError::AuthenticationFailed { .. }, _) => StatusCode::UNAUTHORIZED,
            (_, TransitionCode::Ok) => StatusCode::OK,
            (_, TransitionCode::UnauthorizedRole) => StatusCode::FORBIDDEN,
            (_, TransitionCode::InvalidState) => StatusCode::CONFLICT,
            (_, TransitionCode::PreconditionFailed) => StatusCode::UNPROCESSABLE_ENTITY,
            (_, TransitionCode::AllocationExhausted) => StatusCode::SERVICE_UNAVAILABLE,
            (_, TransitionCode::NotFound) => StatusCode::NOT_FOUND,
            (_, TransitionCode::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

fn request_context(actor: StaffActor) -> RequestContext {
    RequestContext::new(actor, OffsetDateTime::now_utc())
}

fn draft_locator(draft_id: &str) -> Result<CaseLocator, HttpError> {
    Ok(CaseLocator::draft(draft_id)?)
}

/// Handler for POST `/cases`.
async fn handle_create_draft(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(req): Json<CreateDraftRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_draft(&mut persistence, &ctx, &req)?))
}

/// Handler for GET `/cases`.
async fn handle_list_cases(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<ListCasesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_cases(
        &mut persistence,
        &actor,
        query.tab.as_deref(),
    )?))
}

/// Handler for GET `/cases/{tracking_id}`.
async fn handle_get_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(tracking_id): Path<String>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let locator: CaseLocator = CaseLocator::Tracking(tracking_id);
    Ok(Json(get_case(&mut persistence, &actor, &locator)?))
}

/// Handler for GET `/cases/{tracking_id}/history`.
async fn handle_case_history(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(tracking_id): Path<String>,
) -> Result<Json<TimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let locator: CaseLocator = CaseLocator::Tracking(tracking_id);
    Ok(Json(get_case_history(&mut persistence, &actor, &locator)?))
}

/// Handler for POST `/cases/{tracking_id}/actions`.
///
/// Runs one workflow transition.
async fn handle_case_action(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(tracking_id): Path<String>,
    Json(req): Json<CaseActionRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        staff_id = %actor.staff_id,
        tracking_id = %tracking_id,
        action = %req.action,
        "Handling case action"
    );
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(perform_case_action(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &CaseLocator::Tracking(tracking_id),
        &req,
    )?))
}

/// Handler for POST `/cases/{tracking_id}/remarks`.
async fn handle_add_remark(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(tracking_id): Path<String>,
    Json(req): Json<AddRemarkRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(add_remark(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &CaseLocator::Tracking(tracking_id),
        &req,
    )?))
}

/// Handler for GET `/drafts/{draft_id}`.
async fn handle_get_draft(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(draft_id): Path<String>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    let locator: CaseLocator = draft_locator(&draft_id)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_case(&mut persistence, &actor, &locator)?))
}

/// Handler for PUT `/drafts/{draft_id}`.
async fn handle_update_draft(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(draft_id): Path<String>,
    Json(req): Json<UpdateDraftRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let locator: CaseLocator = draft_locator(&draft_id)?;
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_draft(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &locator,
        &req,
    )?))
}

/// Handler for DELETE `/drafts/{draft_id}`.
async fn handle_delete_draft(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(draft_id): Path<String>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let locator: CaseLocator = draft_locator(&draft_id)?;
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_draft(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &locator,
    )?))
}

/// Handler for POST `/drafts/{draft_id}/documents`.
async fn handle_record_document(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(draft_id): Path<String>,
    Json(req): Json<RecordDocumentRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let locator: CaseLocator = draft_locator(&draft_id)?;
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(record_document(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &locator,
        &req,
    )?))
}

/// Handler for POST `/drafts/{draft_id}/finalize`.
///
/// The first finalize issues the tracking ID.
async fn handle_finalize_draft(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(draft_id): Path<String>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let locator: CaseLocator = draft_locator(&draft_id)?;
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(finalize_draft(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &locator,
    )?))
}

/// Handler for POST `/staff`.
async fn handle_create_staff(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(req): Json<CreateStaffRequest>,
) -> Result<Json<CreateStaffResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_staff(
        &mut persistence,
        &app_state.config,
        app_state.notifier.as_ref(),
        &ctx,
        &req,
    )?))
}

/// Handler for GET `/staff`.
async fn handle_list_staff(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<ListStaffResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_staff(&mut persistence, &actor)?))
}

/// Handler for GET `/staff/examiners`.
async fn handle_list_examiners(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<ListExaminersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_examiners(&mut persistence, &actor)?))
}

/// Handler for PUT `/staff/{staff_pk}`.
async fn handle_update_staff(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(staff_pk): Path<i64>,
    Json(req): Json<UpdateStaffRequest>,
) -> Result<Json<StaffStatusResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_staff(&mut persistence, &ctx, staff_pk, &req)?))
}

/// Handler for POST `/staff/{staff_pk}/deactivate`.
async fn handle_deactivate_staff(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(staff_pk): Path<i64>,
) -> Result<Json<StaffStatusResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(deactivate_staff(&mut persistence, &ctx, staff_pk)?))
}

/// Handler for POST `/staff/{staff_pk}/reactivate`.
async fn handle_reactivate_staff(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(staff_pk): Path<i64>,
) -> Result<Json<StaffStatusResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(reactivate_staff(&mut persistence, &ctx, staff_pk)?))
}

/// Handler for POST `/staff/{staff_pk}/resend-activation`.
async fn handle_resend_activation(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(staff_pk): Path<i64>,
) -> Result<Json<StaffStatusResponse>, HttpError> {
    let ctx: RequestContext = request_context(actor);
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(resend_activation(
        &mut persistence,
        app_state.notifier.as_ref(),
        &ctx,
        staff_pk,
    )?))
}

/// Handler for POST `/activate`. Unauthenticated; the nonce is the
/// credential.
async fn handle_activate(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActivateAccountRequest>,
) -> Result<Json<StaffStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(activate_account(
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for POST `/auth/events`.
///
/// Called by the identity collaborator after each login attempt or logout.
async fn handle_login_event(
    AxumState(app_state): AxumState<AppState>,
    _collaborator: IdentityCollaborator,
    Json(req): Json<LoginEventRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(record_login_event(
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for POST `/feedback`. Anonymous callers are allowed.
async fn handle_feedback(
    AxumState(app_state): AxumState<AppState>,
    OptionalActor(actor): OptionalActor,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(submit_feedback(
        &mut persistence,
        actor.as_ref(),
        &req,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for GET `/audit`.
async fn handle_audit_log(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_audit_log(
        &mut persistence,
        &actor,
        query.action.as_deref(),
        query.limit,
    )?))
}

/// Handler for GET `/track/{tracking_id}`. Public.
async fn handle_track(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_id): Path<String>,
) -> Result<Json<TrackingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(track_case(&mut persistence, &tracking_id)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/cases", post(handle_create_draft).get(handle_list_cases))
        .route("/cases/{tracking_id}", get(handle_get_case))
        .route("/cases/{tracking_id}/history", get(handle_case_history))
        .route("/cases/{tracking_id}/actions", post(handle_case_action))
        .route("/cases/{tracking_id}/remarks", post(handle_add_remark))
        .route(
            "/drafts/{draft_id}",
            get(handle_get_draft)
                .put(handle_update_draft)
                .delete(handle_delete_draft),
        )
        .route("/drafts/{draft_id}/documents", post(handle_record_document))
        .route("/drafts/{draft_id}/finalize", post(handle_finalize_draft))
        .route("/staff", post(handle_create_staff).get(handle_list_staff))
        .route("/staff/examiners", get(handle_list_examiners))
        .route("/staff/{staff_pk}", axum::routing::put(handle_update_staff))
        .route("/staff/{staff_pk}/deactivate", post(handle_deactivate_staff))
        .route("/staff/{staff_pk}/reactivate", post(handle_reactivate_staff))
        .route(
            "/staff/{staff_pk}/resend-activation",
            post(handle_resend_activation),
        )
        .route("/activate", post(handle_activate))
        .route("/auth/events", post(handle_login_event))
        .route("/feedback", post(handle_feedback))
        .route("/audit", get(handle_audit_log))
        .route("/track/{tracking_id}", get(handle_track))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing LegalTrack Server");

    let config: WorkflowConfig = WorkflowConfig::new(
        &args.timezone,
        args.tracking_width,
        args.allocation_attempts,
    )?;

    let mut persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {db_path}");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(email) = &args.bootstrap_admin_email {
        match bootstrap_super_admin(
            &mut persistence,
            &config,
            email,
            &args.bootstrap_admin_name,
            OffsetDateTime::now_utc(),
        )? {
            Some(admin) => info!(staff_id = %admin.staff_id, "Created initial Super Admin"),
            None => info!("Super Admin already exists, skipping bootstrap"),
        }
    }

    if args.identity_token.is_none() {
        warn!("No --identity-token given; /auth/events will reject every call");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config,
        notifier: Arc::new(TracingNotifier),
        identity_token: args.identity_token.map(Arc::from),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!(
        timezone = %args.timezone,
        tracking_width = args.tracking_width,
        "Server listening on {}",
        addr
    );

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
