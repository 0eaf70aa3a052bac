// POST /api/chat: run one question through the gate and the model.
//
// 200 {"answer": "..."}  answered, or refused (answer is the refusal string)
// 400 {"error": "..."}   body not JSON of this shape, question missing/null,
//                        or over the length cap
// 502 {"error": "..."}   generation backend failed
//
// The request body is never logged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::RespondError;
use crate::orchestrator::require_query;
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct ChatRequest {
    question: Option<String>,
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    // The rejection text can quote the body, so it is not passed on
    let Ok(Json(body)) = payload else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Request body must be JSON like {\"question\": \"...\"}",
        );
    };

    let result = match require_query(body.question.as_deref()) {
        Ok(question) => state.responder.respond(question).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(answer) => (
            StatusCode::OK,
            Json(serde_json::json!({ "answer": answer })),
        )
            .into_response(),
        Err(e @ RespondError::InvalidInput(_)) => {
            api_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(RespondError::Generation(_)) => api_error(
            StatusCode::BAD_GATEWAY,
            "The model is unavailable right now. Please try again later.",
        ),
    }
}
