//! API route definitions

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{Map, Value};

use super::shared::SharedStateHandle;
use super::types::*;
use crate::panel::{self, PanelModel};
use crate::templates::TemplateStoreError;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create the API router with all endpoints
pub fn create_router(state: SharedStateHandle) -> Router {
    Router::new()
        // Designer page at root
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        // Effect modules
        .route("/api/fx", get(list_fx))
        .route("/api/fx/:id/enabled", put(set_fx_enabled))
        .route("/api/fx/:id/params/:param", put(set_fx_parameter))
        .route("/api/fx/:id/reset", post(reset_fx))
        // Composed output
        .route("/api/css", get(css_handler))
        // Persisted design
        .route("/api/state", get(export_state))
        .route("/api/state", post(import_state))
        .route("/api/theme", put(update_theme))
        // Named templates
        .route("/api/templates", get(list_templates))
        .route("/api/templates/:name", get(get_template))
        .route("/api/templates/:name", put(save_template))
        .route("/api/templates/:name/load", post(load_template))
        // WebSocket endpoint for panel refreshes
        .route("/ws", get(super::websocket::ws_handler))
        .with_state(state)
}

fn not_found(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found(message)))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message)))
}

fn template_error(e: TemplateStoreError) -> (StatusCode, Json<ApiError>) {
    match e {
        TemplateStoreError::InvalidName(_) => bad_request(e.to_string()),
        _ => {
            tracing::error!(error = %e, "Template store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::internal(e.to_string())))
        }
    }
}

// ============================================================================
// Status Handlers
// ============================================================================

async fn index_handler(State(state): State<SharedStateHandle>) -> Html<String> {
    let designer = state.designer();
    Html(panel::render_page(&designer.panel(), designer.stylesheet()))
}

async fn status_handler(State(state): State<SharedStateHandle>) -> Json<StatusResponse> {
    let designer = state.designer();
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        modules: designer.registry().len(),
        ready: designer.is_ready(),
        panel_revision: designer.panel_revision(),
    })
}

// ============================================================================
// Effect Handlers
// ============================================================================

async fn list_fx(State(state): State<SharedStateHandle>) -> Json<PanelModel> {
    Json(state.designer().panel())
}

fn module_state(designer: &crate::designer::Designer, id: &str) -> Value {
    designer
        .registry()
        .state(id)
        .map(|s| Value::Object(s.fields().clone()))
        .unwrap_or(Value::Null)
}

async fn set_fx_enabled(
    State(state): State<SharedStateHandle>,
    Path(id): Path<String>,
    Json(req): Json<SetEnabledRequest>,
) -> ApiResult<FxUpdateResponse> {
    let mut designer = state.designer_mut();
    if !designer.set_enabled(&id, req.enabled) {
        return Err(not_found(format!("FX module {} not found", id)));
    }
    let module_state = module_state(&designer, &id);
    Ok(Json(FxUpdateResponse { id, state: module_state }))
}

async fn set_fx_parameter(
    State(state): State<SharedStateHandle>,
    Path((id, param)): Path<(String, String)>,
    Json(req): Json<SetParameterRequest>,
) -> ApiResult<FxUpdateResponse> {
    if req.value.is_array() || req.value.is_object() {
        return Err(bad_request(format!("Parameter {} must be a scalar value", param)));
    }
    let mut designer = state.designer_mut();
    if !designer.set_parameter(&id, &param, req.value) {
        return Err(not_found(format!("FX module {} not found", id)));
    }
    let module_state = module_state(&designer, &id);
    Ok(Json(FxUpdateResponse { id, state: module_state }))
}

async fn reset_fx(State(state): State<SharedStateHandle>, Path(id): Path<String>) -> ApiResult<FxUpdateResponse> {
    let mut designer = state.designer_mut();
    if !designer.reset(&id) {
        return Err(not_found(format!("FX module {} not registered", id)));
    }
    let module_state = module_state(&designer, &id);
    Ok(Json(FxUpdateResponse { id, state: module_state }))
}

async fn css_handler(State(state): State<SharedStateHandle>) -> impl IntoResponse {
    let css = state.designer().stylesheet().to_string();
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css)
}

// ============================================================================
// Document Handlers
// ============================================================================

async fn export_state(State(state): State<SharedStateHandle>) -> Json<Value> {
    Json(state.designer().export_document())
}

async fn import_state(State(state): State<SharedStateHandle>, body: String) -> ApiResult<ImportResponse> {
    let summary = state
        .designer_mut()
        .import_document(&body)
        .map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(summary.into()))
}

async fn update_theme(
    State(state): State<SharedStateHandle>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    let mut designer = state.designer_mut();
    designer.set_theme(&patch).map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(Value::Object(designer.theme().fields().clone())))
}

// ============================================================================
// Template Handlers
// ============================================================================

async fn list_templates(State(state): State<SharedStateHandle>) -> ApiResult<TemplatesResponse> {
    let templates = state.templates().list().map_err(template_error)?;
    Ok(Json(TemplatesResponse { templates }))
}

async fn get_template(State(state): State<SharedStateHandle>, Path(name): Path<String>) -> ApiResult<Value> {
    state
        .templates()
        .get(&name)
        .map_err(template_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Template {} not found", name)))
}

async fn save_template(State(state): State<SharedStateHandle>, Path(name): Path<String>) -> ApiResult<MessageResponse> {
    let document = state.designer().export_document();
    state.templates().put(&name, &document).map_err(template_error)?;
    Ok(Json(MessageResponse {
        message: format!("Template {} saved", name),
    }))
}

async fn load_template(State(state): State<SharedStateHandle>, Path(name): Path<String>) -> ApiResult<ImportResponse> {
    let document = state
        .templates()
        .get(&name)
        .map_err(template_error)?
        .ok_or_else(|| not_found(format!("Template {} not found", name)))?;
    let summary = state
        .designer_mut()
        .import_value(document)
        .map_err(|e| bad_request(e.to_string()))?;
    tracing::info!(template = %name, "Loaded design template");
    Ok(Json(summary.into()))
}
