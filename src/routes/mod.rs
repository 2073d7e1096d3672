//! API routes
//!
//! Serves the chat page and the JSON API it drives. Every message leaves
//! the server with its rendered, escaped markup alongside the raw text.

mod error;

use std::sync::LazyLock;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::persona;
use crate::conversation::{Message, Role};
use crate::core::Session;
use crate::render::{escape_html, render_markdown};
use crate::AppState;

pub use error::ApiError;

static PAGE: LazyLock<String> = LazyLock::new(|| {
    include_str!("../../assets/index.html")
        .replace("{{BRAND}}", &escape_html(persona::BRAND))
        .replace("{{TAGLINE}}", &escape_html(persona::TAGLINE))
        .replace("{{PLACEHOLDER}}", &escape_html(persona::INPUT_PLACEHOLDER))
        .replace("{{THINKING}}", &escape_html(persona::THINKING))
        .replace("{{APOLOGY}}", &escape_html(persona::APOLOGY))
        .replace("{{ERROR_NOTICE}}", &escape_html(persona::ERROR_NOTICE))
});

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// A message as the page displays it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    pub html: String,
}

impl From<&Message> for RenderedMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
            is_error: msg.is_error,
            html: render_markdown(&msg.content),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub messages: Vec<RenderedMessage>,
    pub accepting_input: bool,
    /// Starter prompts, offered only before the first interaction
    pub suggestions: Vec<&'static str>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let suggestions = if session.conversation.is_fresh() && session.accepting_input() {
            persona::EXAMPLE_PROMPTS.to_vec()
        } else {
            Vec::new()
        };
        Self {
            id: session.id,
            messages: session
                .conversation
                .messages()
                .iter()
                .map(RenderedMessage::from)
                .collect(),
            accepting_input: session.accepting_input(),
            suggestions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub appended: Vec<RenderedMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

async fn index() -> Html<&'static str> {
    Html(PAGE.as_str())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.chat_engine.create_session().await;
    (StatusCode::CREATED, Json(SessionView::from(&session)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.chat_engine.session(id).await?;
    Ok(Json(SessionView::from(&session)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.chat_engine.end_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submission = state.chat_engine.submit(id, &request.text).await?;
    if submission.is_noop() {
        tracing::debug!(session = %id, "Ignored blank submission");
    }

    Ok(Json(SubmitResponse {
        appended: submission.appended.iter().map(RenderedMessage::from).collect(),
        notice: submission.failed.then_some(persona::ERROR_NOTICE),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/messages", post(submit_message))
}
