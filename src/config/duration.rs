//! Duration parsing for the `--timeout` option.

use anyhow::Context;
use std::time::Duration;

/// Parse a duration string like "1h", "2m", "30s" or "30".
///
/// Plain numbers are seconds. Zero is rejected since a zero request timeout
/// fails every call.
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    let (num_str, unit_secs) = if let Some(num_str) = s.strip_suffix('h') {
        (num_str, 3600)
    } else if let Some(num_str) = s.strip_suffix('m') {
        (num_str, 60)
    } else if let Some(num_str) = s.strip_suffix('s') {
        (num_str, 1)
    } else {
        (s, 1)
    };

    let value: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration value: {s}"))?;
    let secs = value
        .checked_mul(unit_secs)
        .with_context(|| format!("Duration too large: {s}"))?;
    if secs == 0 {
        anyhow::bail!("Duration must be greater than zero: {s}");
    }

    Ok(Duration::from_secs(secs))
}
