use std::sync::LazyLock;

use regex::Regex;

/// Prefix the necklace firmware puts on its own log lines
pub const NECKLACE_TAG: &str = "[NECKLACE]";

static RSSI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RSSI[:=]\s*(-?\d+)").expect("Invalid RSSI regex"));

/// Whether the line is a necklace log line that mentions RSSI at all.
/// Only these lines are worth running the pattern against.
pub fn mentions_rssi(line: &str) -> bool {
    line.starts_with(NECKLACE_TAG) && line.contains("RSSI")
}

/// Extract the signal strength from a necklace log line, e.g.
/// `[NECKLACE] From: AA:BB | Bytes: 10 | Data: x | RSSI: -47`
pub fn extract_rssi(line: &str) -> Option<i32> {
    if !mentions_rssi(line) {
        return None;
    }

    RSSI_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse().ok())
}
