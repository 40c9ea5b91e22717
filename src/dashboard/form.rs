use serde::Serialize;

pub const DEFAULT_ENDPOINT: &str = "https://lorem-api.com/api/lorem";
pub const DEFAULT_FREQUENCY: &str = "5";
pub const DEFAULT_DURATION: &str = "3";

/// Raw form inputs, exactly as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingForm {
    pub endpoint: String,
    pub frequency: String,
    pub duration: String,
}

impl Default for PollingForm {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            frequency: DEFAULT_FREQUENCY.to_string(),
            duration: DEFAULT_DURATION.to_string(),
        }
    }
}

impl PollingForm {
    /// Coerce the inputs into the body sent to `POST /api/start`.
    /// Frequency and duration are read as integers and clamped to at least 1.
    pub fn to_configuration(&self) -> PollingConfiguration {
        PollingConfiguration {
            endpoint: self.endpoint.clone(),
            frequency: clamp_seconds(&self.frequency),
            duration: clamp_seconds(&self.duration),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PollingConfiguration {
    pub endpoint: String,
    pub frequency: u64,
    pub duration: u64,
}

fn clamp_seconds(input: &str) -> u64 {
    match parse_int_prefix(input) {
        Some(n) if n >= 1 => n as u64,
        _ => 1,
    }
}

/// Reads a leading base-10 integer: leading whitespace and a sign are accepted,
/// parsing stops at the first non-digit ("12s" is 12, "3.9" is 3). Saturates on overflow.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}
