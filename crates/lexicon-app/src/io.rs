use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use lexicon_types::{AppEvent, SessionNotice};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Forward stdin lines to the event loop until EOF or cancellation
pub async fn stdin_reader(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let tx = event_tx.clone_sync();
    let reader_cancel = cancel.clone();

    // Plain thread: a read blocked on the terminal must not hold up shutdown
    std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if reader_cancel.is_cancelled() {
                    return;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {e}");
                        break;
                    }
                };
                if tx.send(AppEvent::Command(line)).is_err() {
                    return;
                }
            }
            tracing::debug!("stdin closed");
            let _ = tx.send(AppEvent::Shutdown);
        })?;

    cancel.cancelled().await;
    Ok(())
}

/// Refresh the access token on a fixed period while signed in
pub async fn session_refresher(
    state: Arc<AppState>,
    period: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = cancel.cancelled() => break,
        }

        let session = state.lexicon.session();
        if !session.is_logged_in().await {
            continue;
        }

        let notice = match session.refresh().await {
            Ok(()) => SessionNotice::Refreshed,
            Err(e) => {
                tracing::error!("Token refresh failed: {e}");
                state.sign_out().await;
                SessionNotice::Expired {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(e) = event_tx.send(AppEvent::Session(notice)).await {
            tracing::error!("Failed to send session notice: {e}");
            break;
        }
    }

    tracing::info!("Session refresher stopping");
    Ok(())
}
