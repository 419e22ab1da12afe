use super::Collector;
use crate::error::{Result, StatuslineError};

/// Shown when no start time is known.
pub const ZERO_ELAPSED: &str = "0m";

/// Where the session start comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    /// Duration already measured by the host.
    Duration { ms: u64 },
    /// Epoch-millis start time; elapsed is measured against `now_ms`.
    StartedAt { started_ms: u64, now_ms: u64 },
    Unknown,
}

/// Elapsed session time as a compact string ("2h15m", "45m").
pub struct ElapsedCollector {
    start: SessionStart,
}

impl ElapsedCollector {
    pub fn new(start: SessionStart) -> Self {
        Self { start }
    }
}

impl Collector for ElapsedCollector {
    type Output = String;

    fn name(&self) -> &'static str {
        "elapsed"
    }

    fn collect(&self) -> Result<String> {
        let ms = match self.start {
            SessionStart::Duration { ms } => ms,
            SessionStart::StartedAt { started_ms, now_ms } => now_ms.saturating_sub(started_ms),
            SessionStart::Unknown => {
                return Err(StatuslineError::NotConfigured("session start time".into()))
            }
        };
        Ok(format_elapsed(ms))
    }

    fn sentinel(&self) -> String {
        ZERO_ELAPSED.to_string()
    }
}

/// Format milliseconds as whole minutes, with hours once past the hour.
pub fn format_elapsed(ms: u64) -> String {
    let minutes = ms / 60_000;
    let (h, m) = (minutes / 60, minutes % 60);
    if h > 0 {
        format!("{}h{}m", h, m)
    } else {
        format!("{}m", m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0m");
        assert_eq!(format_elapsed(59_999), "0m");
        assert_eq!(format_elapsed(45 * 60_000), "45m");
        assert_eq!(format_elapsed(60 * 60_000), "1h0m");
        assert_eq!(format_elapsed((2 * 60 + 15) * 60_000 + 30_000), "2h15m");
        assert_eq!(format_elapsed(26 * 3_600_000), "26h0m");
    }

    #[test]
    fn test_started_at_measures_against_now() {
        let collector = ElapsedCollector::new(SessionStart::StartedAt {
            started_ms: 1_000,
            now_ms: 1_000 + 90 * 60_000,
        });
        assert_eq!(collector.collect().unwrap(), "1h30m");
    }

    #[test]
    fn test_start_in_the_future_is_zero() {
        let collector = ElapsedCollector::new(SessionStart::StartedAt {
            started_ms: 10_000,
            now_ms: 5_000,
        });
        assert_eq!(collector.collect().unwrap(), "0m");
    }

    #[test]
    fn test_unknown_start_is_an_error_with_zero_sentinel() {
        let collector = ElapsedCollector::new(SessionStart::Unknown);
        assert!(collector.collect().is_err());
        assert_eq!(collector.sentinel(), ZERO_ELAPSED);
    }
}
