use tokio::sync::watch;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type CancelSender = watch::Sender<bool>;
pub type CancelReceiver = watch::Receiver<bool>;

/// Cancellation token for a run; flips to `true` once.
#[must_use]
pub fn cancel_channel() -> (CancelSender, CancelReceiver) {
    watch::channel(false)
}

/// Cancels the run on Ctrl+C (and SIGTERM on unix). Exits quietly if the run
/// finishes first and every receiver is dropped.
#[must_use]
pub fn setup_signal_cancel_handler(cancel_tx: CancelSender) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = cancel_tx.closed() => {}
                _ = tokio::signal::ctrl_c() => {
                    cancel_tx.send_replace(true);
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    cancel_tx.send_replace(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = cancel_tx.closed() => {}
                _ = tokio::signal::ctrl_c() => {
                    cancel_tx.send_replace(true);
                }
            }
        }
    })
}
