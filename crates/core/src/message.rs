//! Wire message schemas for the uplink/downlink channel.
//!
//! Inbound frames are [`InboundCommand`]s; everything the relay emits is an
//! [`OutboundMessage`], distinguished on the wire by its `type` field.

use serde::{Deserialize, Serialize};

use crate::state::{ModeName, OnboardState};

/// An operator command parsed from an inbound frame.
///
/// Unrecognized fields are ignored. `mode` is kept as a raw string here;
/// the processor validates it against the closed mode set so that an
/// unknown mode is acked as a no-op instead of dropped at intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundCommand {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub seq: Option<i64>,
}

impl InboundCommand {
    /// Parse the raw mode string against the closed mode set.
    pub fn parsed_mode(&self) -> Option<ModeName> {
        match self.mode.as_deref() {
            Some("IDLE") => Some(ModeName::Idle),
            Some("SAFE") => Some(ModeName::Safe),
            Some("SCIENCE") => Some(ModeName::Science),
            _ => None,
        }
    }
}

/// A command sitting in the queue, stamped at intake time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedCommand {
    pub command: InboundCommand,
    pub seq: i64,
    /// Epoch seconds at which the intake loop accepted the frame.
    pub enqueued_at: f64,
}

/// Ack status reported to the operator.
///
/// `Ok` means received-and-processed, not necessarily applied; `Ignored`
/// is the extension point for distinguishing no-op commands and is only
/// emitted when strict acks are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AckStatus {
    Ok,
    Ignored,
}

/// Acknowledgment for one dequeued command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub status: AckStatus,
    pub seq: i64,
    pub command: Option<String>,
    /// Snapshot of the onboard state after processing.
    pub applied_state: OnboardState,
    /// Epoch seconds at which processing finished.
    pub applied_at: f64,
}

/// A point-in-time sensor reading from the telemetry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub temperature: Option<f64>,
    pub raw_display: Option<String>,
    /// Epoch seconds at which the sample was taken.
    pub sampled_at: f64,
}

impl TelemetrySample {
    /// Sample with null fields, used when the source is unavailable.
    pub fn unavailable(sampled_at: f64) -> Self {
        Self {
            temperature: None,
            raw_display: None,
            sampled_at,
        }
    }
}

fn default_source() -> String {
    "downlink".to_string()
}

/// One periodic telemetry frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryMessage {
    #[serde(default = "default_source")]
    pub source: String,
    pub queue_depth: usize,
    pub temperature: Option<f64>,
    pub raw_display: Option<String>,
    pub sampled_at: f64,
    pub mode: ModeName,
}

impl TelemetryMessage {
    /// Merge a sensor sample with the current mode and queue depth.
    pub fn compose(sample: TelemetrySample, queue_depth: usize, mode: ModeName) -> Self {
        Self {
            source: default_source(),
            queue_depth,
            temperature: sample.temperature,
            raw_display: sample.raw_display,
            sampled_at: sample.sampled_at,
            mode,
        }
    }
}

/// Outbound frame, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Ack(Acknowledgment),
    Telemetry(TelemetryMessage),
}

impl OutboundMessage {
    /// Serialize to a wire frame.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_ignores_unknown_fields() {
        let cmd: InboundCommand =
            serde_json::from_str(r#"{"command":"set_mode","mode":"SAFE","extra":42}"#).unwrap();
        assert_eq!(cmd.command.as_deref(), Some("set_mode"));
        assert_eq!(cmd.parsed_mode(), Some(ModeName::Safe));
        assert!(cmd.seq.is_none());
    }

    #[test]
    fn bogus_mode_parses_but_does_not_validate() {
        let cmd: InboundCommand =
            serde_json::from_str(r#"{"command":"set_mode","mode":"BOGUS"}"#).unwrap();
        assert_eq!(cmd.parsed_mode(), None);
    }

    #[test]
    fn ack_frame_is_type_tagged() {
        let ack = Acknowledgment {
            status: AckStatus::Ok,
            seq: 7,
            command: Some("set_mode".to_string()),
            applied_state: OnboardState {
                mode: ModeName::Science,
            },
            applied_at: 1_700_000_000.5,
        };
        let json = OutboundMessage::Ack(ack).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "ack");
        assert_eq!(value["status"], "OK");
        assert_eq!(value["seq"], 7);
        assert_eq!(value["applied_state"]["mode"], "SCIENCE");
    }

    #[test]
    fn telemetry_frame_carries_depth_and_mode() {
        let sample = TelemetrySample {
            temperature: Some(23.5),
            raw_display: Some("TEMP:23.50C".to_string()),
            sampled_at: 100.0,
        };
        let msg = TelemetryMessage::compose(sample, 3, ModeName::Idle);
        let json = OutboundMessage::Telemetry(msg).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "telemetry");
        assert_eq!(value["source"], "downlink");
        assert_eq!(value["queue_depth"], 3);
        assert_eq!(value["mode"], "IDLE");
        assert_eq!(value["temperature"], 23.5);
    }

    #[test]
    fn unavailable_sample_has_null_fields() {
        let sample = TelemetrySample::unavailable(5.0);
        assert!(sample.temperature.is_none());
        assert!(sample.raw_display.is_none());
    }
}
