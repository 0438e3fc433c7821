//! Player action handlers
//!
//! Each handler runs one pure engine operation through the publish loop and
//! hands the fresh snapshot back to the caller; everyone else receives it
//! through their subscription.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{Phase, QuestionId};
use std::sync::Arc;

use super::handlers::error_reply;
use super::ConnCtx;

pub async fn handle_submit_passwords(
    state: &Arc<AppState>,
    ctx: &ConnCtx,
    words: Vec<String>,
) -> Option<ServerMessage> {
    tracing::info!(
        "{} submitting {} passwords in session {}",
        ctx.name,
        words.len(),
        ctx.code
    );
    match state
        .apply(&ctx.code, |s| s.submit_passwords(&ctx.name, &words))
        .await
    {
        Ok(session) => Some(ServerMessage::SessionState { session }),
        Err(e) => Some(error_reply(&e)),
    }
}

pub async fn handle_ask_question(
    state: &Arc<AppState>,
    ctx: &ConnCtx,
    text: String,
) -> Option<ServerMessage> {
    tracing::info!("{} asking a question in session {}", ctx.name, ctx.code);
    match state
        .apply(&ctx.code, |s| s.ask_question(&ctx.name, &text))
        .await
    {
        Ok(session) => {
            if session.phase == Phase::Finished {
                tracing::info!(
                    "Session {} finished, won by {}",
                    ctx.code,
                    session.winner.as_deref().unwrap_or("nobody")
                );
            }
            Some(ServerMessage::SessionState { session })
        }
        Err(e) => Some(error_reply(&e)),
    }
}

pub async fn handle_answer_question(
    state: &Arc<AppState>,
    ctx: &ConnCtx,
    question_id: QuestionId,
    text: String,
) -> Option<ServerMessage> {
    tracing::info!(
        "{} answering question {} in session {}",
        ctx.name,
        question_id,
        ctx.code
    );
    match state
        .apply(&ctx.code, |s| s.answer_question(question_id, &ctx.name, &text))
        .await
    {
        Ok(session) => Some(ServerMessage::SessionState { session }),
        Err(e) => Some(error_reply(&e)),
    }
}
