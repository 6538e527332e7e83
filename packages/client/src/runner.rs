//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{
        MAX_RECONNECT_ATTEMPTS, RECONNECT_INTERVAL_SECS, next_failure_count,
        should_attempt_reconnect,
    },
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_thread,
};

/// Run the chat client with reconnection logic
pub async fn run_client(url: String, name: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = spawn_input_thread(name.clone());
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            name,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &name, &mut input).await {
            Ok(()) => {
                tracing::info!("Left the chat");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("{}", e);
                failed_attempts = next_failure_count(&e, failed_attempts);

                if !should_attempt_reconnect(failed_attempts, MAX_RECONNECT_ATTEMPTS) {
                    return Err(Box::new(ClientError::ReconnectFailed(
                        MAX_RECONNECT_ATTEMPTS,
                    )));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    failed_attempts + 1,
                    MAX_RECONNECT_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
