//! Command socket server and session orchestration.

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use touch_relay_gesture::{GestureMapper, InputHandler};
use touch_relay_injector::{EventSink, Injector};
use touch_relay_types::{Command, CommandError, GamepadKey};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SessionError;

/// Why a client stopped being served.
enum ServeOutcome {
    Disconnected,
    Shutdown,
}

/// Requests the session loop to stop. Clonable; the first signal wins.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<()>,
}

impl ShutdownHandle {
    pub async fn shutdown(&self) {
        let _ = self.tx.send(()).await;
    }
}

/// One producer session: the command listener, the gesture handler, and the
/// injector it drives.
///
/// Serves one command client at a time; the handler is reset on every
/// connect and disconnect so a dropped client never leaves a contact held.
pub struct Session {
    listener: TcpListener,
    injector: Injector,
    handler: Box<dyn InputHandler>,
    shutdown_rx: mpsc::Receiver<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl Session {
    /// Bind the command listener and start the injector worker.
    pub async fn bind(config: &Config, sink: Box<dyn EventSink>) -> Result<Self, SessionError> {
        let listener = TcpListener::bind(config.session.command_addr()).await?;
        let injector = Injector::start(
            sink,
            config.injector.queue_capacity,
            config.injector.overflow,
        );
        let handler = Box::new(GestureMapper::new(&config.layout));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Ok(Self {
            listener,
            injector,
            handler,
            shutdown_rx,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr, SessionError> {
        Ok(self.listener.local_addr()?)
    }

    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the accept loop until shut down.
    ///
    /// Bad input never ends the session; only the shutdown handle does.
    pub async fn run(mut self) -> Result<(), SessionError> {
        info!(addr = %self.listener.local_addr()?, "command listener ready");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            info!(addr = %addr, "command client connected");
                            self.handler.reset(&mut self.injector);

                            let outcome = match self.serve_client(stream).await {
                                Ok(outcome) => outcome,
                                Err(e) => {
                                    warn!(error = %e, "command client error");
                                    ServeOutcome::Disconnected
                                }
                            };

                            self.handler.reset(&mut self.injector);
                            if matches!(outcome, ServeOutcome::Shutdown) {
                                break;
                            }
                            info!("command client disconnected");
                        }
                        Err(e) => {
                            debug!(error = %e, "accept error");
                        }
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    break;
                }
            }
        }

        info!("session shutting down");
        self.injector.shutdown().await;
        Ok(())
    }

    /// Stream whitespace-separated tokens from one client. Tokens may span
    /// reads, so bytes are accumulated until a separator lands.
    async fn serve_client(&mut self, mut stream: TcpStream) -> Result<ServeOutcome, SessionError> {
        let mut buf = [0u8; 1024];
        let mut token = Vec::new();

        loop {
            let n = tokio::select! {
                n = stream.read(&mut buf) => n?,
                _ = self.shutdown_rx.recv() => return Ok(ServeOutcome::Shutdown),
            };

            if n == 0 {
                self.dispatch_token(&token);
                return Ok(ServeOutcome::Disconnected);
            }

            for &byte in &buf[..n] {
                if byte.is_ascii_whitespace() {
                    self.dispatch_token(&token);
                    token.clear();
                } else {
                    token.push(byte);
                }
            }
        }
    }

    fn dispatch_token(&mut self, token: &[u8]) {
        if token.is_empty() {
            return;
        }

        let Ok(token) = std::str::from_utf8(token) else {
            warn!("discarding non-ASCII command token");
            return;
        };

        match token.parse::<Command>() {
            Ok(Command::Key {
                key: GamepadKey::Unknown,
                ..
            }) => {}
            Ok(Command::Key { key, pressed }) => {
                debug!(?key, pressed, "key command");
                self.handler.on_key(&mut self.injector, key, pressed);
            }
            Ok(Command::Stick { side, x, y }) => {
                self.handler.on_stick_move(&mut self.injector, side, x, y);
            }
            Err(CommandError::KeyIndexOutOfRange(index)) => {
                debug!(index, "ignoring out-of-range key index");
            }
            Err(e) => {
                warn!(token, error = %e, "discarding malformed command");
            }
        }
    }
}
