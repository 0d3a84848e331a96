use std::io::Write;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

pub const IST_OFFSET_SECONDS: i64 = 19_800; // +5:30
pub const PST_OFFSET_SECONDS: i64 = -28_800; // -8:00

const RULE: &str = "-------------------------";

/// A named zone with a fixed offset from UTC. No DST.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Zone {
    pub name: String,
    pub offset_secs: i64,
}

impl Zone {
    pub fn new(name: &str, offset_secs: i64) -> Self {
        Self {
            name: name.to_string(),
            offset_secs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("zone name must not be empty");
        }
        validate_offset(self.offset_secs).with_context(|| format!("zone '{}'", self.name))
    }

    /// e.g. `IST (+05:30)`
    pub fn header(&self) -> String {
        format!("{} ({})", self.name, format_offset(self.offset_secs))
    }
}

pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new("UTC", 0),
        Zone::new("IST", IST_OFFSET_SECONDS),
        Zone::new("PST", PST_OFFSET_SECONDS),
    ]
}

/// Offsets must stay strictly within one day of UTC.
pub fn validate_offset(offset_secs: i64) -> Result<()> {
    if offset_secs.checked_abs().is_none_or(|abs| abs >= SECONDS_PER_DAY) {
        bail!(
            "offset {offset_secs}s is out of range (must be within ±{}s)",
            SECONDS_PER_DAY - 1
        );
    }
    Ok(())
}

/// `±HH:MM`, dropping any sub-minute remainder.
pub fn format_offset(offset_secs: i64) -> String {
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let abs = offset_secs.abs();
    let h = abs / SECONDS_PER_HOUR;
    let m = (abs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{sign}{h:02}:{m:02}")
}

/// Write one display frame for `now` across `zones`.
///
/// A zone whose conversion fails is reported and skipped; the rest still render.
/// Returns the number of zones that rendered.
pub fn render_frame(out: &mut dyn Write, now: i64, zones: &[Zone]) -> Result<usize> {
    let mut rendered = 0;
    for zone in zones {
        let dt = match calendar::convert_with_offset(now, zone.offset_secs) {
            Ok(dt) => dt,
            Err(e) => {
                log::warn!("skipping zone {}: {e}", zone.name);
                writeln!(out, "{} conversion failed!\n", zone.name)?;
                continue;
            }
        };

        writeln!(out, "{}", zone.header())?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Time : {}", calendar::format_clock(&dt))?;
        writeln!(out, "Date : {}", calendar::format_date(&dt))?;
        if zone.offset_secs == 0 {
            writeln!(out, "Epoch: {now}")?;
        }
        writeln!(out)?;
        rendered += 1;
    }
    Ok(rendered)
}

/// Write the clock, date and ISO lines for a single `epoch` shifted by `offset_secs`.
pub fn write_conversion(out: &mut dyn Write, epoch: i64, offset_secs: i64) -> Result<()> {
    validate_offset(offset_secs)?;
    let dt = calendar::convert_with_offset(epoch, offset_secs)?;
    writeln!(out, "Time : {}", calendar::format_clock(&dt))?;
    writeln!(out, "Date : {}", calendar::format_date(&dt))?;
    writeln!(out, "ISO  : {dt}{}", format_offset(offset_secs))?;
    log::debug!("{epoch}{offset_secs:+}s -> local {}s", dt.to_epoch_seconds());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(now: i64, zones: &[Zone]) -> (usize, String) {
        let mut buf = Vec::new();
        let n = render_frame(&mut buf, now, zones).unwrap();
        (n, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn headers_show_signed_offsets() {
        let headers: Vec<_> = default_zones().iter().map(Zone::header).collect();
        assert_eq!(headers, ["UTC (+00:00)", "IST (+05:30)", "PST (-08:00)"]);
    }

    #[test]
    fn offset_formatting() {
        assert_eq!(format_offset(0), "+00:00");
        assert_eq!(format_offset(19_800), "+05:30");
        assert_eq!(format_offset(-28_800), "-08:00");
        assert_eq!(format_offset(-12_600), "-03:30");
    }

    #[test]
    fn renders_all_three_zones() {
        // 2024-02-29T12:34:56Z
        let (n, text) = render(1_709_210_096, &default_zones());
        assert_eq!(n, 3);
        let expected = "\
UTC (+00:00)
-------------------------
Time : 12:34:56 PM
Date : 29/02/2024
Epoch: 1709210096

IST (+05:30)
-------------------------
Time : 06:04:56 PM
Date : 29/02/2024

PST (-08:00)
-------------------------
Time : 04:34:56 AM
Date : 29/02/2024

";
        assert_eq!(text, expected);
    }

    #[test]
    fn zone_crossing_midnight_changes_date() {
        // 2023-12-31T20:00:00Z is already 2024 in IST
        let (_, text) = render(1_704_052_800, &[Zone::new("IST", IST_OFFSET_SECONDS)]);
        assert!(text.contains("Time : 01:30:00 AM"));
        assert!(text.contains("Date : 01/01/2024"));
    }

    #[test]
    fn failed_zone_is_skipped_not_fatal() {
        let (n, text) = render(0, &default_zones());
        assert_eq!(n, 2);
        assert!(text.contains("UTC (+00:00)"));
        assert!(text.contains("Time : 05:30:00 AM"));
        assert!(text.contains("PST conversion failed!"));
        assert!(!text.contains("PST (-08:00)"));
    }

    #[test]
    fn conversion_prints_clock_date_and_iso() {
        let mut buf = Vec::new();
        write_conversion(&mut buf, 0, IST_OFFSET_SECONDS).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Time : 05:30:00 AM\nDate : 01/01/1970\nISO  : 1970-01-01T05:30:00+05:30\n"
        );
    }

    #[test]
    fn conversion_before_negative_offset_is_invalid_input() {
        let mut buf = Vec::new();
        let err = write_conversion(&mut buf, 0, PST_OFFSET_SECONDS).unwrap_err();
        assert_eq!(
            err.downcast_ref::<calendar::CalendarError>(),
            Some(&calendar::CalendarError::InvalidInput { epoch: -28_800 })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn conversion_rejects_offsets_beyond_a_day() {
        let mut buf = Vec::new();
        assert!(write_conversion(&mut buf, 1_000_000, 86_400).is_err());
        assert!(write_conversion(&mut buf, 1_000_000, i64::MIN).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn validate_rejects_out_of_range_offsets() {
        assert!(Zone::new("UTC", 0).validate().is_ok());
        assert!(Zone::new("LINT", 14 * 3_600).validate().is_ok());
        assert!(Zone::new("BAD", 86_400).validate().is_err());
        assert!(Zone::new("BAD", -86_400).validate().is_err());
        assert!(Zone::new("  ", 0).validate().is_err());
    }
}
