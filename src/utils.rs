//! Terminal and formatting helpers for the CLI.

use std::io;

use chrono::{DateTime, Local};
use rpassword::prompt_password;
use zeroize::Zeroizing;

/// Read a password from the terminal without echo.
pub fn read_password_prompt(prompt: &str) -> io::Result<Zeroizing<String>> {
    prompt_password(prompt).map(Zeroizing::new)
}

/// Local "YYYY-MM-DD HH:MM:SS" for an RFC 3339 timestamp; unparsable input is returned as is.
pub fn display_timestamp(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| rfc3339.to_string())
}

/// Format bytes into a human-readable string (e.g. 1536 -> "1.50 KB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB", "PB", "EB"];
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(u64::MAX), "16.00 EB");
    }

    #[test]
    fn bad_timestamp_passes_through() {
        assert_eq!(display_timestamp("yesterday"), "yesterday");
        assert_eq!(display_timestamp("2024-03-01T10:20:30+00:00").len(), 19);
    }
}
