/// `M:SS` clock display, e.g. `1:05`.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Compact human duration: `45s`, `1m 5s`, `2m`, `1h 3m`, `1h`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    if total < 60 {
        return format!("{total}s");
    }
    if total < 3600 {
        let (m, s) = (total / 60, total % 60);
        return if s > 0 {
            format!("{m}m {s}s")
        } else {
            format!("{m}m")
        };
    }
    let (h, m) = (total / 3600, (total % 3600) / 60);
    if m > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{h}h")
    }
}
