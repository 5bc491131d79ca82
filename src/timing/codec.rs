use crate::error::EngineError;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

// Keeps the whole-second part comfortably inside u64 millis.
const MAX_SECONDS: f64 = 1.0e12;

/// Format elapsed seconds as `MM:SS.mmm`, or `HH:MM:SS.mmm` from one hour up.
///
/// Milliseconds are rounded half away from zero on the decimal value of the
/// input, so `123.1235` becomes `02:03.124`. A rounding carry cascades into
/// seconds, minutes and hours. `None`, negative and non-finite inputs format
/// as zero.
pub fn format_time(seconds: Option<f64>) -> String {
    let total = seconds.map(to_millis).unwrap_or(0);

    let hours = total / MILLIS_PER_HOUR;
    let minutes = (total % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let secs = (total % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = total % MILLIS_PER_SECOND;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}

/// Round elapsed seconds to whole milliseconds.
///
/// Works on the shortest decimal representation of the float rather than on
/// `seconds * 1000.0`, whose binary product can land just below a half.
fn to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let repr = seconds.min(MAX_SECONDS).to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let whole: u64 = whole.parse().unwrap_or(0);
    let digits = fraction.as_bytes();
    let millis = (0..3).fold(0u64, |acc, i| {
        let digit = digits.get(i).map(|d| u64::from(d - b'0')).unwrap_or(0);
        acc * 10 + digit
    });
    let round_up = digits.get(3).is_some_and(|d| *d >= b'5');

    whole * MILLIS_PER_SECOND + millis + u64::from(round_up)
}

/// Parse `MM:SS.mmm` or `HH:MM:SS.mmm` back into elapsed seconds.
///
/// The fractional part is required and may have one to three digits. Seconds
/// must be below 60, and so must minutes when an hours segment is present.
pub fn parse_time(text: &str) -> Result<f64, EngineError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, parse_whole(text, m, "minutes")?, *s),
        [h, m, s] => {
            let minutes = parse_whole(text, m, "minutes")?;
            if minutes >= 60 {
                return Err(EngineError::format(text, "minutes must be below 60"));
            }
            (parse_whole(text, h, "hours")?, minutes, *s)
        }
        _ => {
            return Err(EngineError::format(
                text,
                "expected MM:SS.mmm or HH:MM:SS.mmm",
            ))
        }
    };

    let Some((whole_secs, fraction)) = seconds.split_once('.') else {
        return Err(EngineError::format(text, "seconds need a .mmm fraction"));
    };
    let whole_secs = parse_whole(text, whole_secs, "seconds")?;
    if whole_secs >= 60 {
        return Err(EngineError::format(text, "seconds must be below 60"));
    }
    if fraction.is_empty() || fraction.len() > 3 {
        return Err(EngineError::format(
            text,
            "fraction must have one to three digits",
        ));
    }
    let scale = 10u64.pow(3 - fraction.len() as u32);
    let millis = parse_whole(text, fraction, "milliseconds")? * scale;

    let total = hours
        .checked_mul(MILLIS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes.checked_mul(MILLIS_PER_MINUTE)?))
        .and_then(|t| t.checked_add(whole_secs * MILLIS_PER_SECOND + millis))
        .ok_or_else(|| EngineError::format(text, "time is too large"))?;

    // Dividing whole millis keeps "02:03.456" bit-identical to 123.456.
    Ok(total as f64 / MILLIS_PER_SECOND as f64)
}

fn parse_whole(input: &str, segment: &str, name: &str) -> Result<u64, EngineError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::format(
            input,
            format!("{} segment '{}' is not numeric", name, segment),
        ));
    }
    segment
        .parse()
        .map_err(|_| EngineError::format(input, format!("{} segment is too large", name)))
}
