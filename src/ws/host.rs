//! Host-only command handlers
//!
//! Authorization is checked in the dispatch layer before these run; the
//! engine itself stays authority-agnostic.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

use super::handlers::error_reply;
use super::ConnCtx;

pub async fn handle_start_password_submission(
    state: &Arc<AppState>,
    ctx: &ConnCtx,
) -> Option<ServerMessage> {
    tracing::info!("Host {} closing the lobby of session {}", ctx.name, ctx.code);
    match state
        .apply(&ctx.code, |s| s.advance_to_password_submission())
        .await
    {
        Ok(session) => Some(ServerMessage::SessionState { session }),
        Err(e) => Some(error_reply(&e)),
    }
}

pub async fn handle_start_playing(state: &Arc<AppState>, ctx: &ConnCtx) -> Option<ServerMessage> {
    tracing::info!("Host {} starting play in session {}", ctx.name, ctx.code);
    match state
        .apply(&ctx.code, |s| {
            let mut rng = rand::rng();
            s.start_playing(&mut rng)
        })
        .await
    {
        Ok(session) => Some(ServerMessage::SessionState { session }),
        Err(e) => Some(error_reply(&e)),
    }
}

pub async fn handle_delete_session(state: &Arc<AppState>, ctx: &ConnCtx) -> Option<ServerMessage> {
    tracing::info!("Host {} deleting session {}", ctx.name, ctx.code);
    match state.delete_session(&ctx.code).await {
        // Every subscriber, this connection included, observes the stream
        // closing and reports the deletion
        Ok(()) => None,
        Err(e) => Some(error_reply(&e)),
    }
}
