//! Server-rendered screens
//!
//! Every page response carries a [`RenderedPage`] extension naming the
//! template and holding the context it was rendered from.

pub mod context;
pub mod templates;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::DomainError;

pub use context::{NodeItem, RoomItem, SubstationItem};

/// Template id and context of a rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub template: &'static str,
    pub context: Value,
}

impl RenderedPage {
    pub fn title(&self) -> Option<&str> {
        self.context.get("title").and_then(Value::as_str)
    }
}

/// Navigation data shared by every page: the substation menu and the
/// signed-in user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chrome {
    pub menu: Vec<SubstationItem>,
    pub username: Option<String>,
}

/// A page ready to be turned into a response.
pub struct Page {
    pub status: StatusCode,
    pub template: &'static str,
    pub title: String,
    pub context: Value,
    pub body: String,
    pub chrome: Chrome,
}

impl Page {
    pub fn new(template: &'static str, title: impl Into<String>, chrome: Chrome) -> Self {
        Self {
            status: StatusCode::OK,
            template,
            title: title.into(),
            context: Value::Object(Default::default()),
            body: String::new(),
            chrome,
        }
    }

    /// Attach a context entry; values that fail to serialize become null.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            error!("Failed to serialize context entry {}: {}", key, e);
            Value::Null
        });
        if let Value::Object(map) = &mut self.context {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = body;
        self
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut context = self.context;
        if let Value::Object(map) = &mut context {
            map.insert("title".to_string(), Value::String(self.title.clone()));
        }

        let html = templates::layout(&self.title, &self.chrome, &self.body);
        let mut response = (self.status, Html(html)).into_response();
        response.extensions_mut().insert(RenderedPage {
            template: self.template,
            context,
        });
        response
    }
}

/// Failure of a screen handler, rendered as a bare error page.
#[derive(Debug)]
pub enum ScreenError {
    NotFound,
    Forbidden,
    Internal(String),
}

impl From<DomainError> for ScreenError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => Self::NotFound,
            DomainError::Unauthorized(_) | DomainError::Forbidden(_) => Self::Forbidden,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        let (status, heading) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "403 Forbidden"),
            Self::Internal(msg) => {
                error!("Screen failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error (500)")
            }
        };
        (status, Html(templates::error_page(heading))).into_response()
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;
