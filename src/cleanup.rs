use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// How often the reaper looks for abandoned sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn a background task that deletes sessions nobody has touched for
/// longer than `ttl`. Records are never persisted, so an abandoned session
/// would otherwise live as long as the process.
pub fn spawn_session_reaper(state: Arc<AppState>, ttl: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;

            for code in state.expire_idle(ttl).await {
                tracing::info!("Reaped idle session {}", code);
            }
        }
    });
}
