use crate::types::{QuestionId, Session, SessionCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateSession {
        host_name: String,
    },
    JoinSession {
        code: SessionCode,
        player_name: String,
    },
    SubmitPasswords {
        words: Vec<String>,
    },
    AskQuestion {
        text: String,
    },
    AnswerQuestion {
        question_id: QuestionId,
        text: String,
    },
    /// Detach from the current session and return to a fresh view. Purely
    /// local: the shared record is untouched.
    LeaveSession,
    // Host-only messages
    /// Close the lobby and start collecting passwords.
    HostStartPasswordSubmission,
    /// Deal passwords and open play.
    HostStartPlaying,
    /// Remove the session record for everyone.
    HostDeleteSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
    },
    SessionCreated {
        code: SessionCode,
        session: Session,
    },
    SessionJoined {
        code: SessionCode,
        session: Session,
    },
    /// Full snapshot push; clients re-render from the latest one they hold.
    SessionState {
        session: Session,
    },
    LeftSession,
    /// The shared record is gone (host deleted it or it expired).
    SessionDeleted {
        code: SessionCode,
    },
    Error {
        code: String,
        msg: String,
    },
}
