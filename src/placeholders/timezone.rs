use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Format used for every time placeholder.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whole-hour part of the swept UTC offsets.
pub const OFFSET_HOURS: RangeInclusive<i32> = -12..=14;
/// Minute parts of the swept UTC offsets.
pub const OFFSET_MINUTES: [u32; 3] = [0, 30, 45];
/// Prefixes accepted for offset placeholders (`{time_utc_…}`, `{time_gmt_…}`).
pub const OFFSET_PREFIXES: [&str; 2] = ["utc", "gmt"];

/// Named zones exposed as `{time_<name>}`.
pub const NAMED_ZONES: &[(&str, Tz)] = &[
    ("bangkok", chrono_tz::Asia::Bangkok),
    ("berlin", chrono_tz::Europe::Berlin),
    ("london", chrono_tz::Europe::London),
    ("los_angeles", chrono_tz::America::Los_Angeles),
    ("new_york", chrono_tz::America::New_York),
    ("paris", chrono_tz::Europe::Paris),
    ("singapore", chrono_tz::Asia::Singapore),
    ("sydney", chrono_tz::Australia::Sydney),
    ("tokyo", chrono_tz::Asia::Tokyo),
    ("toronto", chrono_tz::America::Toronto),
];

pub fn format_in<Z>(now: DateTime<Utc>, zone: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    now.with_timezone(zone).format(TIME_FORMAT).to_string()
}

/// Placeholder for a UTC offset, e.g. `{time_gmt_plus_07_00}` or
/// `{time_utc_minus_03_30}`.
///
/// The sign applies to the whole offset: `-3:30` is three and a half hours
/// behind UTC.
pub fn offset_label(prefix: &str, hours: i32, minutes: u32) -> String {
    let sign = if hours < 0 { "minus" } else { "plus" };
    format!("{{time_{prefix}_{sign}_{:02}_{:02}}}", hours.unsigned_abs(), minutes)
}

pub fn fixed_offset(hours: i32, minutes: u32) -> Option<FixedOffset> {
    let magnitude = hours.abs() * 3600 + minutes as i32 * 60;
    FixedOffset::east_opt(if hours < 0 { -magnitude } else { magnitude })
}

/// Cheap guard run before [`replace_offsets`].
pub fn has_offset_placeholder(template: &str) -> bool {
    OFFSET_PREFIXES.iter().any(|p| template.contains(&format!("{{time_{p}_")))
}

/// Replace every offset placeholder in `template` with the time at that offset.
pub fn replace_offsets(template: &str, now: DateTime<Utc>) -> String {
    let mut out = template.to_string();
    for hours in OFFSET_HOURS {
        for minutes in OFFSET_MINUTES {
            let labels: Vec<String> = OFFSET_PREFIXES.iter().map(|p| offset_label(p, hours, minutes)).collect();
            if !labels.iter().any(|l| out.contains(l.as_str())) {
                continue;
            }
            let Some(offset) = fixed_offset(hours, minutes) else {
                continue;
            };
            let time = format_in(now, &offset);
            for label in &labels {
                out = out.replace(label.as_str(), &time);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn labels_encode_sign_and_padding() {
        assert_eq!(offset_label("gmt", 7, 0), "{time_gmt_plus_07_00}");
        assert_eq!(offset_label("utc", -3, 30), "{time_utc_minus_03_30}");
        assert_eq!(offset_label("utc", 0, 45), "{time_utc_plus_00_45}");
    }

    #[test]
    fn negative_offsets_apply_to_minutes_too() {
        assert_eq!(fixed_offset(-3, 30).map(|o| o.local_minus_utc()), Some(-(3 * 3600 + 30 * 60)));
        assert_eq!(fixed_offset(5, 45).map(|o| o.local_minus_utc()), Some(5 * 3600 + 45 * 60));
    }

    #[test]
    fn replaces_offsets_in_both_prefixes() {
        let out = replace_offsets("a {time_gmt_plus_07_00} b {time_utc_minus_09_30} c {time_utc_plus_14_00}", noon());
        assert_eq!(out, "a 2024-01-15 19:00:00 b 2024-01-15 02:30:00 c 2024-01-16 02:00:00");
    }

    #[test]
    fn offsets_outside_the_sweep_pass_through() {
        let template = "{time_utc_plus_15_00} {time_utc_plus_05_15}";
        assert!(has_offset_placeholder(template));
        assert_eq!(replace_offsets(template, noon()), template);
    }

    #[test]
    fn named_zone_honours_daylight_saving() {
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(format_in(noon(), &chrono_tz::Europe::Berlin), "2024-01-15 13:00:00");
        assert_eq!(format_in(summer, &chrono_tz::Europe::Berlin), "2024-07-01 14:00:00");
    }
}
