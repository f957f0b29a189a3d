// Recent-alerts table rows.

use crate::models::LogEntry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Style class carried by every alert row.
pub const ROW_CLASS: &str = "log-alert";

pub const DEFAULT_CONFIDENCE_MIN: f64 = 80.0;
pub const DEFAULT_CONFIDENCE_MAX: f64 = 100.0;

/// One rendered table row. `confidence` is decoration, regenerated every render.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub class: &'static str,
    pub timestamp: String,
    pub src_ip: String,
    pub dst_ip: String,
    pub protocol: String,
    pub attack_type: String,
    pub confidence: f64,
    pub action: String,
}

impl LogRow {
    /// Display cells in column order: time, source, destination, protocol,
    /// type with its confidence (`DoS Attack (91.3%)`), action.
    pub fn cells(&self) -> [String; 6] {
        [
            self.timestamp.clone(),
            self.src_ip.clone(),
            self.dst_ip.clone(),
            self.protocol.clone(),
            format!("{} ({:.1}%)", self.attack_type, self.confidence),
            self.action.clone(),
        ]
    }
}

/// Supplies the decorative confidence figure shown next to each attack type.
pub trait ConfidenceSource: Send {
    fn next_confidence(&mut self) -> f64;
}

/// Uniform in `[min, max)`.
pub struct RandomConfidence {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl Default for RandomConfidence {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_MIN, DEFAULT_CONFIDENCE_MAX)
    }
}

impl RandomConfidence {
    /// `min` must be below `max` (checked by config validation).
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            min,
            max,
        }
    }
}

impl ConfidenceSource for RandomConfidence {
    fn next_confidence(&mut self) -> f64 {
        self.rng.gen_range(self.min..self.max)
    }
}

/// Always the same value; for deterministic output.
pub struct FixedConfidence(pub f64);

impl ConfidenceSource for FixedConfidence {
    fn next_confidence(&mut self) -> f64 {
        self.0
    }
}

pub struct TableRenderer {
    confidence: Box<dyn ConfidenceSource>,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new(Box::new(RandomConfidence::default()))
    }
}

impl TableRenderer {
    pub fn new(confidence: Box<dyn ConfidenceSource>) -> Self {
        Self { confidence }
    }

    /// Full replacement rows for the table body, same order as `logs`.
    pub fn render(&mut self, logs: &[LogEntry]) -> Vec<LogRow> {
        logs.iter()
            .map(|entry| LogRow {
                class: ROW_CLASS,
                timestamp: entry.timestamp.clone(),
                src_ip: entry.src_ip.clone(),
                dst_ip: entry.dst_ip.clone(),
                protocol: entry.protocol.clone(),
                attack_type: entry.type_.clone(),
                confidence: self.confidence.next_confidence(),
                action: action_label(entry.action.as_deref()),
            })
            .collect()
    }
}

/// "Blocked" -> "[BLOCKED]"; missing action -> "-".
fn action_label(action: Option<&str>) -> String {
    match action.map(str::trim) {
        Some(a) if !a.is_empty() => format!("[{}]", a.to_uppercase()),
        _ => "-".to_string(),
    }
}
