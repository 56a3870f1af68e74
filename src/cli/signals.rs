//! Signal handling for the record and play runners

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Stop signal fed by SIGINT and SIGTERM.
///
/// The handler tasks forward each signal into a channel; the runners
/// await `recv` alongside the transport event stream.
pub struct StopSignal {
    receiver: mpsc::Receiver<()>,
}

impl StopSignal {
    /// Install the signal handlers and start listening.
    pub fn listen() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(4);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                if tx_int.send(()).await.is_err() {
                    break;
                }
            }
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Wait for the next stop request
    pub async fn recv(&mut self) {
        self.receiver.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listen_installs_handlers() {
        // Installing twice in one process is fine; each gets its own channel.
        let first = StopSignal::listen();
        let second = StopSignal::listen();
        assert!(first.is_ok());
        assert!(second.is_ok());
    }
}
