//! Relay session lifecycle and loops.
//!
//! A session owns one upgraded WebSocket and runs four futures under a
//! single `select!`: command intake, delayed command processing, periodic
//! telemetry, and an outbound writer. The writer exists so the processor
//! and the publisher can both emit frames without sharing the socket sink;
//! interleaving of acks and telemetry on the wire is unspecified. When any
//! future finishes (peer close, transport fault), the others are dropped
//! and the connection is released.
//!
//! Ordering invariant: acks are emitted in dequeue order, which equals
//! arrival order at intake (FIFO end-to-end).

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, RwLock};

use cubelink_core::{
    epoch_millis, epoch_secs, AckStatus, Acknowledgment, CommandQueue, InboundCommand,
    OnboardState, OutboundMessage, QueuedCommand, RelayConfig, TelemetryMessage, TelemetrySample,
};
use cubelink_devices::{TelemetrySource, UplinkSink};

/// Everything one session's loops share.
pub struct SessionContext {
    pub state: Arc<RwLock<OnboardState>>,
    pub queue: Arc<CommandQueue>,
    pub telemetry: Arc<dyn TelemetrySource>,
    pub uplink: Arc<dyn UplinkSink>,
    pub config: RelayConfig,
}

impl SessionContext {
    /// Build a session context with a fresh queue sized per config.
    pub fn new(
        state: Arc<RwLock<OnboardState>>,
        telemetry: Arc<dyn TelemetrySource>,
        uplink: Arc<dyn UplinkSink>,
        config: RelayConfig,
    ) -> Self {
        let queue = Arc::new(CommandQueue::with_capacity(
            config.queue_capacity,
            config.overflow_policy,
        ));
        Self {
            state,
            queue,
            telemetry,
            uplink,
            config,
        }
    }
}

/// Parse one inbound text frame into a queued command.
///
/// Malformed frames yield `None` and are dropped without an ack; `seq` is
/// the caller-supplied value or the current epoch milliseconds.
pub fn accept_frame(text: &str) -> Option<QueuedCommand> {
    let command: InboundCommand = match serde_json::from_str(text) {
        Ok(cmd) => cmd,
        Err(e) => {
            tracing::debug!(category = "relay", error = %e, "dropping malformed frame");
            return None;
        }
    };
    let seq = command.seq.unwrap_or_else(epoch_millis);
    Some(QueuedCommand {
        command,
        seq,
        enqueued_at: epoch_secs(),
    })
}

/// Apply one dequeued command after the simulated transit delay and build
/// its acknowledgment.
///
/// Unknown commands and invalid modes leave the state untouched; the ack
/// is emitted either way. An uplink failure is logged and never suppresses
/// the ack.
pub async fn process_one(ctx: &SessionContext, item: &QueuedCommand) -> Acknowledgment {
    tokio::time::sleep(ctx.config.command_latency()).await;

    let mut applied = false;
    if item.command.command.as_deref() == Some("set_mode") {
        if let Some(mode) = item.command.parsed_mode() {
            ctx.state.write().await.mode = mode;
            applied = true;
            if let Err(e) = ctx.uplink.send_uplink_command(mode).await {
                tracing::error!(category = "relay", %mode, error = %e, "failed to send uplink");
            }
        }
    }

    let status = if applied || !ctx.config.strict_acks {
        AckStatus::Ok
    } else {
        AckStatus::Ignored
    };

    Acknowledgment {
        status,
        seq: item.seq,
        command: item.command.command.clone(),
        applied_state: *ctx.state.read().await,
        applied_at: epoch_secs(),
    }
}

/// Compose the next telemetry frame from a sample, the queue depth, and the
/// current mode. A failed sample read degrades to null fields.
pub async fn next_telemetry(ctx: &SessionContext) -> TelemetryMessage {
    let sample = match ctx.telemetry.read_sensor_data().await {
        Ok(sample) => sample,
        Err(e) => {
            tracing::warn!(category = "relay", error = %e, "telemetry source unavailable");
            TelemetrySample::unavailable(epoch_secs())
        }
    };
    let queue_depth = ctx.queue.len().await;
    let mode = ctx.state.read().await.mode;
    TelemetryMessage::compose(sample, queue_depth, mode)
}

/// Command intake: read frames, stamp them, enqueue them.
///
/// Never mutates onboard state and never acks. Returns when the peer
/// closes or the transport faults.
async fn intake_loop<S>(ctx: &SessionContext, stream: &mut S)
where
    S: futures::Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let Some(item) = accept_frame(&text) else {
                    continue;
                };
                let seq = item.seq;
                if let Err(e) = ctx.queue.push(item).await {
                    tracing::warn!(category = "relay", seq, error = %e, "dropping command");
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!(category = "relay", "peer closed the channel");
                return;
            }
            Ok(_) => {} // binary/ping/pong frames carry no commands
            Err(e) => {
                tracing::warn!(category = "relay", error = %e, "transport fault on intake");
                return;
            }
        }
    }
}

/// Command processor: pop, delay, apply, ack, in strict FIFO order.
async fn process_loop(ctx: &SessionContext, out_tx: mpsc::UnboundedSender<OutboundMessage>) {
    loop {
        let item = ctx.queue.pop().await;
        let ack = process_one(ctx, &item).await;
        if out_tx.send(OutboundMessage::Ack(ack)).is_err() {
            return;
        }
    }
}

/// Telemetry publisher: one frame per period, independent of command
/// traffic.
async fn telemetry_loop(ctx: &SessionContext, out_tx: mpsc::UnboundedSender<OutboundMessage>) {
    let mut ticker = tokio::time::interval(ctx.config.telemetry_period());
    loop {
        ticker.tick().await;
        let frame = next_telemetry(ctx).await;
        if out_tx.send(OutboundMessage::Telemetry(frame)).is_err() {
            return;
        }
    }
}

/// Outbound writer: serialize frames and push them down the socket.
async fn write_loop(
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
) {
    while let Some(frame) = out_rx.recv().await {
        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(category = "relay", error = %e, "failed to serialize frame");
                continue;
            }
        };
        if sink.send(Message::Text(json)).await.is_err() {
            return;
        }
    }
}

/// Run one relay session to completion.
///
/// The first future to finish tears the whole session down; the queue and
/// channel are dropped with the context.
pub async fn run_session(socket: WebSocket, ctx: SessionContext) {
    let (sink, mut stream) = socket.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    tokio::select! {
        _ = intake_loop(&ctx, &mut stream) => {
            tracing::info!(category = "relay", "intake loop ended");
        }
        _ = process_loop(&ctx, out_tx.clone()) => {
            tracing::info!(category = "relay", "processor loop ended");
        }
        _ = telemetry_loop(&ctx, out_tx.clone()) => {
            tracing::info!(category = "relay", "telemetry loop ended");
        }
        _ = write_loop(out_rx, sink) => {
            tracing::info!(category = "relay", "outbound writer ended");
        }
    }

    let mode = ctx.state.read().await.mode;
    tracing::info!(category = "relay", %mode, "session closed");
}
