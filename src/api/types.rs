//! API request/response types
//!
//! These types are used for JSON serialization in API endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fx::ImportSummary;

// ============================================================================
// Status Types
// ============================================================================

/// Server status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Registered effect modules
    pub modules: usize,
    /// Whether the initial catalog load has finished
    pub ready: bool,
    pub panel_revision: u64,
}

// ============================================================================
// Effect Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetParameterRequest {
    pub value: Value,
}

/// Result of a state change on one module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxUpdateResponse {
    pub id: String,
    /// Module state after the change
    pub state: Value,
}

// ============================================================================
// Document Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub merged: Vec<String>,
    pub stored: Vec<String>,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            merged: summary.merged,
            stored: summary.stored,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesResponse {
    pub templates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// WebSocket Types
// ============================================================================

/// Events pushed to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    /// The panel needs rebuilding; clients refetch `/api/fx` and `/api/css`
    Panel { revision: u64 },
}

// ============================================================================
// Error Types
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: "Not Found".to_string(),
            message: message.into(),
            code: 404,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: "Bad Request".to_string(),
            message: message.into(),
            code: 400,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: "Internal Server Error".to_string(),
            message: message.into(),
            code: 500,
        }
    }
}
