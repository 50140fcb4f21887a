//! Cooperative shutdown shared by all transports.

use tokio::sync::{mpsc, watch};

/// Create a linked trigger/listener pair.
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Fires the shutdown signal for every [`Shutdown`] subscribed to it.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

/// Listener side of the shutdown signal. Transports check it between
/// exchanges, never in the middle of one.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// A listener that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been triggered.
    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Trigger dropped without firing.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Owned form of [`Shutdown::wait`], for graceful-shutdown hooks.
    pub async fn triggered(mut self) {
        self.wait().await
    }
}

/// Tracks live connections so shutdown can wait for in-flight exchanges.
#[derive(Debug)]
pub struct ConnectionTracker {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

/// Held by a connection for as long as it is open.
#[derive(Debug, Clone)]
pub struct ConnectionGuard {
    _tx: mpsc::Sender<()>,
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionTracker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { tx, rx }
    }

    pub fn guard(&self) -> ConnectionGuard {
        ConnectionGuard {
            _tx: self.tx.clone(),
        }
    }

    /// Resolve once every guard handed out has been dropped.
    pub async fn wait(self) {
        let Self { tx, mut rx } = self;
        drop(tx);
        let _ = rx.recv().await;
    }
}
