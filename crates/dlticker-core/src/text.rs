//! Text shaping for the live frame: width wrapping, truncation, ETA formatting.

/// Split `line` into chunks of at most `width` characters joined by `\n`.
pub fn wrap_to_width(line: &str, width: usize) -> String {
    if width == 0 {
        return line.to_string();
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `s` to `length` characters, ending in `...` when shortened.
pub fn rtruncate(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let keep = length.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// `HH:MM:SS` for a number of seconds. Negative and non-finite inputs render as zero.
pub fn pretty_eta(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
