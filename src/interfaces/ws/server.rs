//! OCPP 1.6 WebSocket server (C5, §4.5): accepts charge-point connections at
//! `ws://<host>:<port>/<charge_point_id>`, performs the admission handshake,
//! then runs a per-connection read/write pair.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use crate::application::billing_streamer::SharedBillingStreamer;
use crate::application::commands::SharedCommandSender;
use crate::application::ocpp_handler::OcppHandler;
use crate::application::session::SharedSessionRegistry;
use crate::application::transaction_engine::SharedTransactionEngine;
use crate::domain::repository::RepositoryProvider;
use crate::shared::percent_decode::percent_decode;
use crate::shared::shutdown::ShutdownSignal;

const OCPP_SUBPROTOCOL: &str = "ocpp1.6";

pub struct WsServerConfig {
    pub bind_addr: String,
    /// Optional shared `?token=` value required on every handshake (§4.5 step 2).
    pub admission_token: Option<String>,
}

pub struct WsServer {
    config: WsServerConfig,
    repositories: Arc<dyn RepositoryProvider>,
    session_registry: SharedSessionRegistry,
    command_sender: SharedCommandSender,
    transaction_engine: SharedTransactionEngine,
    billing_streamer: SharedBillingStreamer,
}

impl WsServer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: WsServerConfig,
        repositories: Arc<dyn RepositoryProvider>,
        session_registry: SharedSessionRegistry,
        command_sender: SharedCommandSender,
        transaction_engine: SharedTransactionEngine,
        billing_streamer: SharedBillingStreamer,
    ) -> Self {
        Self {
            config,
            repositories,
            session_registry,
            command_sender,
            transaction_engine,
            billing_streamer,
        }
    }

    pub async fn run(self: Arc<Self>, shutdown: ShutdownSignal) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(addr = self.config.bind_addr.as_str(), "OCPP WebSocket server listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => self.clone().spawn_connection(stream, addr),
                        Err(e) => error!(error = %e, "failed to accept TCP connection"),
                    }
                }
                _ = shutdown.wait() => {
                    info!("OCPP WebSocket server shutting down");
                    return Ok(());
                }
            }
        }
    }

    fn spawn_connection(self: Arc<Self>, stream: TcpStream, addr: SocketAddr) {
        tokio::spawn(async move {
            if let Err(e) = self.handle_connection(stream, addr).await {
                error!(peer = %addr, error = %e, "OCPP connection ended with error");
            }
        });
    }

    async fn handle_connection(
        &self,
        stream: TcpStream,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut path_id: Option<String> = None;
        let mut token: Option<String> = None;

        let ws_stream = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, mut response: Response| {
            let (id, tok) = parse_handshake(req.uri());
            path_id = id;
            token = tok;

            let requested = req
                .headers()
                .get("Sec-WebSocket-Protocol")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            if requested.split(',').map(str::trim).any(|p| p == OCPP_SUBPROTOCOL) {
                response
                    .headers_mut()
                    .insert("Sec-WebSocket-Protocol", OCPP_SUBPROTOCOL.parse().unwrap());
            }
            Ok(response)
        })
        .await?;

        // Step 1: derive CP identifier (percent-decoded, leading slash stripped).
        let Some(charge_point_id) = path_id else {
            warn!(peer = %addr, "rejecting connection with no charge point id in path");
            close_with_policy_violation(ws_stream).await;
            return Ok(());
        };

        // Step 2: optional shared admission token.
        if let Some(expected) = &self.config.admission_token {
            if token.as_deref() != Some(expected.as_str()) {
                warn!(peer = %addr, charge_point_id, "rejecting connection with missing/invalid admission token");
                close_with_policy_violation(ws_stream).await;
                return Ok(());
            }
        }

        // Step 3: whitelist membership.
        match self.repositories.charge_points().find_by_id(&charge_point_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(peer = %addr, charge_point_id, "rejecting connection: charge point not whitelisted");
                close_with_policy_violation(ws_stream).await;
                return Ok(());
            }
            Err(e) => {
                error!(peer = %addr, charge_point_id, error = %e, "whitelist lookup failed");
                close_with_policy_violation(ws_stream).await;
                return Ok(());
            }
        }

        // Step 4: accept, log connection record.
        info!(peer = %addr, charge_point_id, "charge point connected");

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        self.session_registry.register(&charge_point_id, tx);

        let handler = Arc::new(OcppHandler::new(
            charge_point_id.clone(),
            Arc::clone(&self.repositories),
            Arc::clone(&self.transaction_engine),
            Arc::clone(&self.billing_streamer),
            Arc::clone(&self.command_sender),
        ));

        let write_cp_id = charge_point_id.clone();
        let write_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(Message::Text(msg)).await {
                    error!(charge_point_id = write_cp_id.as_str(), error = %e, "failed to write frame");
                    break;
                }
            }
        });

        let read_cp_id = charge_point_id.clone();
        let session_registry = Arc::clone(&self.session_registry);
        let read_task = tokio::spawn(async move {
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        session_registry.touch(&read_cp_id);
                        if let Some(reply) = handler.handle(&text).await {
                            if let Err(e) = session_registry.send_to(&read_cp_id, reply) {
                                error!(charge_point_id = read_cp_id.as_str(), error = %e, "failed to queue reply");
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Binary(data)) => {
                        warn!(charge_point_id = read_cp_id.as_str(), bytes = data.len(), "ignoring binary frame");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(charge_point_id = read_cp_id.as_str(), error = %e, "WebSocket read error");
                        break;
                    }
                }
            }
        });

        tokio::select! {
            _ = write_task => {},
            _ = read_task => {},
        }

        self.session_registry.unregister(&charge_point_id);
        self.command_sender.cleanup_charge_point(&charge_point_id);
        info!(charge_point_id, "charge point disconnected");

        Ok(())
    }
}

/// Extracts the (percent-decoded, leading-slash-stripped) CP identifier and
/// optional `token` query parameter from the handshake request path.
fn parse_handshake(uri: &tokio_tungstenite::tungstenite::http::Uri) -> (Option<String>, Option<String>) {
    let path = uri.path().trim_start_matches('/');
    let id = if path.is_empty() { None } else { Some(percent_decode(path)) };

    let token = uri.query().and_then(|q| {
        q.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == "token").then(|| percent_decode(v))
        })
    });

    (id, token)
}

async fn close_with_policy_violation(
    ws_stream: tokio_tungstenite::WebSocketStream<TcpStream>,
) {
    let mut ws_stream = ws_stream;
    let frame = CloseFrame {
        code: CloseCode::Policy,
        reason: "charge point not admitted".into(),
    };
    let _ = ws_stream.send(Message::Close(Some(frame))).await;
}
