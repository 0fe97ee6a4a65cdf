//! Status badge tones

/// Visual tone of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Informative,
    Busy,
    Neutral,
}

/// Tone for a printer badge; a running connection test overrides the status
pub fn printer_tone(status_label: &str, testing: bool) -> Tone {
    if testing {
        return Tone::Busy;
    }
    match status_label.to_lowercase().as_str() {
        "online" => Tone::Positive,
        "offline" => Tone::Negative,
        _ => Tone::Neutral,
    }
}

/// Badge text for a printer card
pub fn printer_badge(status_label: &str, testing: bool) -> &str {
    if testing {
        "Testing..."
    } else {
        status_label
    }
}

/// Tone for a job badge
pub fn job_tone(status_label: &str) -> Tone {
    match status_label.to_lowercase().as_str() {
        "running" => Tone::Positive,
        "failed" => Tone::Negative,
        "completed" => Tone::Informative,
        _ => Tone::Neutral,
    }
}
