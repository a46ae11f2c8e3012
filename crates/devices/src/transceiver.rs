//! Simulated radio transceiver.
//!
//! Stands in for the serial bridge to the remote microcontroller. A
//! background task synthesizes downlink lines in the same shape the real
//! bridge produces (`Received (ASCII): TEMP:23.50C`); the latest parsed
//! reading is cached and handed out by [`TelemetrySource::read_sensor_data`].
//! Uplink writes are reduced to the mode line the bridge would forward.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::Rng;
use regex::Regex;
use tokio::task::JoinHandle;

use cubelink_core::{epoch_secs, ModeName, TelemetrySample};

use crate::collaborator::{DeviceResult, TelemetrySource, UplinkSink};

/// Matches a TEMP:<number> reading anywhere in a downlink line.
static TEMP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TEMP:\s*([+-]?\d+(?:\.\d+)?)").expect("valid regex"));

/// Extract a temperature from a raw downlink line.
pub fn parse_temperature(line: &str) -> Option<f64> {
    TEMP_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Settings for the simulated device.
#[derive(Debug, Clone)]
pub struct TransceiverConfig {
    /// How often a synthetic downlink line arrives.
    pub sample_interval: Duration,
    /// Starting temperature for the random walk, degrees C.
    pub initial_temp_c: f64,
}

impl Default for TransceiverConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(500),
            initial_temp_c: 22.0,
        }
    }
}

#[derive(Debug, Default)]
struct LatestReading {
    raw_line: Option<String>,
    temp_c: Option<f64>,
    /// Cleaned `TEMP:<v>C` line, preferred over the raw line for display.
    display: Option<String>,
}

/// Simulated transceiver implementing both collaborator interfaces.
pub struct SimulatedTransceiver {
    latest: Arc<Mutex<LatestReading>>,
    last_uplink: Mutex<Option<ModeName>>,
    generator: Option<JoinHandle<()>>,
}

impl SimulatedTransceiver {
    /// Create a transceiver without a generator task. Telemetry reads
    /// return null fields until a line is ingested.
    pub fn idle() -> Self {
        Self {
            latest: Arc::new(Mutex::new(LatestReading::default())),
            last_uplink: Mutex::new(None),
            generator: None,
        }
    }

    /// Create a transceiver and start the downlink generator task.
    pub fn start(config: TransceiverConfig) -> Self {
        let latest = Arc::new(Mutex::new(LatestReading::default()));
        let generator = {
            let latest = latest.clone();
            tokio::spawn(async move {
                let mut temp_c = config.initial_temp_c;
                let mut ticker = tokio::time::interval(config.sample_interval);
                loop {
                    ticker.tick().await;
                    temp_c += rand::thread_rng().gen_range(-0.2..0.2);
                    let line = format!("Received (ASCII): TEMP:{temp_c:.2}C");
                    ingest_line(&latest, &line);
                }
            })
        };
        tracing::info!(category = "device", "simulated transceiver started");
        Self {
            latest,
            last_uplink: Mutex::new(None),
            generator: Some(generator),
        }
    }

    /// Feed one raw downlink line, as the serial reader would.
    pub fn ingest_line(&self, line: &str) {
        ingest_line(&self.latest, line);
    }

    /// Last mode forwarded over the uplink, if any.
    pub fn last_uplink(&self) -> Option<ModeName> {
        *self.last_uplink.lock()
    }
}

fn ingest_line(latest: &Mutex<LatestReading>, line: &str) {
    let mut reading = latest.lock();
    reading.raw_line = Some(line.to_string());
    if let Some(temp) = parse_temperature(line) {
        reading.temp_c = Some(temp);
        reading.display = Some(format!("TEMP:{temp:.2}C"));
        tracing::debug!(category = "device", temp_c = temp, "parsed downlink temperature");
    }
}

impl Drop for SimulatedTransceiver {
    fn drop(&mut self) {
        if let Some(task) = self.generator.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl TelemetrySource for SimulatedTransceiver {
    async fn read_sensor_data(&self) -> DeviceResult<TelemetrySample> {
        let reading = self.latest.lock();
        Ok(TelemetrySample {
            temperature: reading.temp_c,
            raw_display: reading.display.clone().or_else(|| reading.raw_line.clone()),
            sampled_at: epoch_secs(),
        })
    }
}

#[async_trait]
impl UplinkSink for SimulatedTransceiver {
    async fn send_uplink_command(&self, mode: ModeName) -> DeviceResult<()> {
        // The real bridge writes "<MODE>\n" to the serial port.
        tracing::info!(category = "device", %mode, "forwarding uplink command");
        *self.last_uplink.lock() = Some(mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_temp_from_noisy_line() {
        assert_eq!(
            parse_temperature("Received (ASCII): TEMP:23.5C  ###"),
            Some(23.5)
        );
        assert_eq!(parse_temperature("TEMP: -4.25"), Some(-4.25));
        assert_eq!(parse_temperature("TEMP:7"), Some(7.0));
    }

    #[test]
    fn ignores_lines_without_temp() {
        assert_eq!(parse_temperature("Received nothing! Listening again..."), None);
        assert_eq!(parse_temperature("TEMP:abc"), None);
    }

    #[tokio::test]
    async fn read_before_any_line_yields_null_fields() {
        let device = SimulatedTransceiver::idle();
        let sample = device.read_sensor_data().await.unwrap();
        assert!(sample.temperature.is_none());
        assert!(sample.raw_display.is_none());
        assert!(sample.sampled_at > 0.0);
    }

    #[tokio::test]
    async fn ingested_line_shows_up_in_sample() {
        let device = SimulatedTransceiver::idle();
        device.ingest_line("Received (ASCII): TEMP:21.70C");
        let sample = device.read_sensor_data().await.unwrap();
        assert_eq!(sample.temperature, Some(21.7));
        assert_eq!(sample.raw_display.as_deref(), Some("TEMP:21.70C"));
    }

    #[tokio::test]
    async fn unparseable_line_keeps_raw_display() {
        let device = SimulatedTransceiver::idle();
        device.ingest_line("garbage frame");
        let sample = device.read_sensor_data().await.unwrap();
        assert!(sample.temperature.is_none());
        assert_eq!(sample.raw_display.as_deref(), Some("garbage frame"));
    }

    #[tokio::test]
    async fn uplink_records_last_mode() {
        let device = SimulatedTransceiver::idle();
        device.send_uplink_command(ModeName::Science).await.unwrap();
        assert_eq!(device.last_uplink(), Some(ModeName::Science));
    }

    #[tokio::test]
    async fn generator_produces_samples() {
        let device = SimulatedTransceiver::start(TransceiverConfig {
            sample_interval: Duration::from_millis(10),
            initial_temp_c: 20.0,
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let sample = device.read_sensor_data().await.unwrap();
        assert!(sample.temperature.is_some());
        let temp = sample.temperature.unwrap();
        assert!((15.0..25.0).contains(&temp), "temp drifted too far: {temp}");
    }
}
