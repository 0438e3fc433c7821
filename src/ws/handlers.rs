//! Client message dispatch
//!
//! Connection lifecycle messages (create/join/leave) are handled right here
//! because they change what the connection is; game actions are dispatched
//! to the host/player handler modules. Host authorization is checked before
//! dispatch.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

use super::{host, player, ConnCtx};

/// Macro to check host authorization and return early if unauthorized
macro_rules! check_host {
    ($ctx:expr, $action:expr) => {
        if !$ctx.is_host {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only the host can {}", $action),
            });
        }
    };
}

/// Macro to require an attached session for game actions
macro_rules! require_session {
    ($conn:expr) => {
        match $conn {
            Some(ref ctx) => ctx.clone(),
            None => {
                return Some(ServerMessage::Error {
                    code: "NOT_JOINED".to_string(),
                    msg: "Create or join a session first".to_string(),
                });
            }
        }
    };
}

pub(super) fn error_reply(err: &GameError) -> ServerMessage {
    ServerMessage::Error {
        code: err.code().to_string(),
        msg: err.to_string(),
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    conn: &mut Option<ConnCtx>,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::CreateSession { host_name } => {
            match state.create_session(&host_name).await {
                Ok(session) => {
                    *conn = Some(ConnCtx {
                        code: session.code.clone(),
                        name: session.host.clone(),
                        is_host: true,
                    });
                    Some(ServerMessage::SessionCreated {
                        code: session.code.clone(),
                        session,
                    })
                }
                Err(e) => Some(error_reply(&e)),
            }
        }

        ClientMessage::JoinSession { code, player_name } => {
            let name = player_name.trim().to_string();
            match state.apply(&code, |s| s.join(&name)).await {
                Ok(session) => {
                    tracing::info!("{} joined session {}", name, code);
                    *conn = Some(ConnCtx {
                        code: code.clone(),
                        name,
                        is_host: false,
                    });
                    Some(ServerMessage::SessionJoined { code, session })
                }
                Err(e) => Some(error_reply(&e)),
            }
        }

        ClientMessage::LeaveSession => match conn.take() {
            Some(ctx) => {
                tracing::info!("{} left session {}", ctx.name, ctx.code);
                Some(ServerMessage::LeftSession)
            }
            None => Some(ServerMessage::Error {
                code: "NOT_JOINED".to_string(),
                msg: "Not in a session".to_string(),
            }),
        },

        // Player actions
        ClientMessage::SubmitPasswords { words } => {
            let ctx = require_session!(conn);
            player::handle_submit_passwords(state, &ctx, words).await
        }

        ClientMessage::AskQuestion { text } => {
            let ctx = require_session!(conn);
            player::handle_ask_question(state, &ctx, text).await
        }

        ClientMessage::AnswerQuestion { question_id, text } => {
            let ctx = require_session!(conn);
            player::handle_answer_question(state, &ctx, question_id, text).await
        }

        // Host-only commands (authorization checked before dispatch)
        ClientMessage::HostStartPasswordSubmission => {
            let ctx = require_session!(conn);
            check_host!(ctx, "close the lobby");
            host::handle_start_password_submission(state, &ctx).await
        }

        ClientMessage::HostStartPlaying => {
            let ctx = require_session!(conn);
            check_host!(ctx, "start the game");
            host::handle_start_playing(state, &ctx).await
        }

        ClientMessage::HostDeleteSession => {
            let ctx = require_session!(conn);
            check_host!(ctx, "delete the session");
            host::handle_delete_session(state, &ctx).await
        }
    }
}
