use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::{
    signal::unix::{Signal, SignalKind},
    sync::broadcast,
};
use tracing::{debug, info};

/// A `ShutdownSignal` is an helper struct that listens for SIGINT and SIGTERM.
pub struct ShutdownSignal {
    /// A future that resolves when a SIGINT signal is received.
    ctrl_c: Pin<Box<dyn Future<Output = io::Result<()>> + Send>>,
    /// A stream that yields when a SIGTERM signal is received.
    term_signal: Signal,
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal").finish_non_exhaustive()
    }
}

impl ShutdownSignal {
    /// Install the signal handlers.
    pub fn new() -> io::Result<Self> {
        let ctrl_c = Box::pin(tokio::signal::ctrl_c());
        let term_signal = tokio::signal::unix::signal(SignalKind::terminate())?;
        Ok(Self { ctrl_c, term_signal })
    }

    /// Forward the first signal to a broadcast channel.
    ///
    /// The returned receiver also resolves if the forwarding task goes away.
    pub fn subscribe(self) -> broadcast::Receiver<()> {
        let (tx, rx) = broadcast::channel(1);
        tokio::spawn(async move {
            self.await;
            info!("Shutdown requested");
            let _ = tx.send(());
        });
        rx
    }
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.ctrl_c.poll_unpin(cx).is_ready() {
            debug!("Received SIGINT signal");
            return Poll::Ready(());
        }

        if this.term_signal.poll_recv(cx).is_ready() {
            debug!("Received SIGTERM signal");
            return Poll::Ready(());
        }

        Poll::Pending
    }
}
