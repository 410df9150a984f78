use std::{future::Future, io};

use tokio_util::sync::CancellationToken;

use crate::info;

/// How the interrupt watcher ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// A second signal arrived while the run was still shutting down.
    Forced,
    /// The signal source failed; interrupts can no longer be observed.
    Unavailable,
}

/// Watches `signal` for the lifetime of the process.
///
/// The first signal cancels `cancel` so the run can stop at the next track
/// and drain its listeners. The second one returns [`Interrupt::Forced`] and
/// the caller is expected to exit without waiting for anything.
pub async fn watch_interrupts<S, F>(mut signal: S, cancel: CancellationToken) -> Interrupt
where
    S: FnMut() -> F,
    F: Future<Output = io::Result<()>>,
{
    if signal().await.is_err() {
        return Interrupt::Unavailable;
    }
    info!("Exit... (press Ctrl-C again to force)");
    cancel.cancel();

    match signal().await {
        Ok(()) => Interrupt::Forced,
        Err(_) => Interrupt::Unavailable,
    }
}
