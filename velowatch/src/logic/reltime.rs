//! Relative-time phrases for the "Mis à jour …" label.
//!
//! Pure functions over an elapsed duration in milliseconds; negative values lie
//! in the past, positive in the future.

use chrono::{DateTime, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Unit magnitudes in milliseconds, largest first. A year is 365 days, a month
/// a twelfth of that.
const UNIT_TABLE: &[(TimeUnit, i64)] = &[
    (TimeUnit::Year, 365 * DAY_MS),
    (TimeUnit::Month, 365 * DAY_MS / 12),
    (TimeUnit::Day, DAY_MS),
    (TimeUnit::Hour, 60 * 60 * 1000),
    (TimeUnit::Minute, 60 * 1000),
    (TimeUnit::Second, 1000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Label language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Fr,
    En,
}

/// Pick the coarsest unit whose magnitude is strictly exceeded by the elapsed
/// duration, seconds if none qualifies. Returns the unit and the signed rounded
/// quantity.
pub fn select_unit(elapsed_ms: i64) -> (TimeUnit, i64) {
    for (unit, magnitude) in UNIT_TABLE {
        if elapsed_ms.abs() > *magnitude || *unit == TimeUnit::Second {
            return (*unit, round_half_up(elapsed_ms as f64 / *magnitude as f64));
        }
    }
    unreachable!("seconds is the terminal fallback");
}

// Halves round toward positive infinity.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn unit_name(unit: TimeUnit, quantity: i64, locale: Locale) -> &'static str {
    let plural = quantity.abs() > 1;
    match locale {
        Locale::Fr => match (unit, plural) {
            (TimeUnit::Year, false) => "an",
            (TimeUnit::Year, true) => "ans",
            (TimeUnit::Month, _) => "mois",
            (TimeUnit::Day, false) => "jour",
            (TimeUnit::Day, true) => "jours",
            (TimeUnit::Hour, false) => "heure",
            (TimeUnit::Hour, true) => "heures",
            (TimeUnit::Minute, false) => "minute",
            (TimeUnit::Minute, true) => "minutes",
            (TimeUnit::Second, false) => "seconde",
            (TimeUnit::Second, true) => "secondes",
        },
        Locale::En => match (unit, plural) {
            (TimeUnit::Year, false) => "year",
            (TimeUnit::Year, true) => "years",
            (TimeUnit::Month, false) => "month",
            (TimeUnit::Month, true) => "months",
            (TimeUnit::Day, false) => "day",
            (TimeUnit::Day, true) => "days",
            (TimeUnit::Hour, false) => "hour",
            (TimeUnit::Hour, true) => "hours",
            (TimeUnit::Minute, false) => "minute",
            (TimeUnit::Minute, true) => "minutes",
            (TimeUnit::Second, false) => "second",
            (TimeUnit::Second, true) => "seconds",
        },
    }
}

/// Idiomatic terms for adjacent days, months, and years; the numeric form
/// applies everywhere else.
fn auto_phrase(unit: TimeUnit, quantity: i64, locale: Locale) -> Option<&'static str> {
    match locale {
        Locale::Fr => match (unit, quantity) {
            (TimeUnit::Day, -2) => Some("avant-hier"),
            (TimeUnit::Day, -1) => Some("hier"),
            (TimeUnit::Day, 1) => Some("demain"),
            (TimeUnit::Day, 2) => Some("après-demain"),
            (TimeUnit::Month, -1) => Some("le mois dernier"),
            (TimeUnit::Month, 1) => Some("le mois prochain"),
            (TimeUnit::Year, -1) => Some("l'année dernière"),
            (TimeUnit::Year, 1) => Some("l'année prochaine"),
            _ => None,
        },
        Locale::En => match (unit, quantity) {
            (TimeUnit::Day, -1) => Some("yesterday"),
            (TimeUnit::Day, 1) => Some("tomorrow"),
            (TimeUnit::Month, -1) => Some("last month"),
            (TimeUnit::Month, 1) => Some("next month"),
            (TimeUnit::Year, -1) => Some("last year"),
            (TimeUnit::Year, 1) => Some("next year"),
            _ => None,
        },
    }
}

/// Human-readable relative phrase, e.g. `-125_000` → "il y a 2 minutes".
pub fn relative_phrase(elapsed_ms: i64, locale: Locale) -> String {
    let (unit, quantity) = select_unit(elapsed_ms);
    if let Some(phrase) = auto_phrase(unit, quantity, locale) {
        return phrase.to_string();
    }
    let name = unit_name(unit, quantity, locale);
    match locale {
        Locale::Fr => {
            if quantity == 0 {
                "maintenant".to_string()
            } else if quantity < 0 {
                format!("il y a {} {}", -quantity, name)
            } else {
                format!("dans {} {}", quantity, name)
            }
        }
        Locale::En => {
            if quantity == 0 {
                "just now".to_string()
            } else if quantity < 0 {
                format!("{} {} ago", -quantity, name)
            } else {
                format!("in {} {}", quantity, name)
            }
        }
    }
}

/// Elapsed time of `updated` relative to `now` in milliseconds, negative for
/// instants in the past.
pub fn elapsed_since(updated: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    updated.signed_duration_since(now).num_milliseconds()
}

/// The full label line rendered by the watcher.
pub fn updated_label(elapsed_ms: i64, locale: Locale) -> String {
    match locale {
        Locale::Fr => format!("Mis à jour {}", relative_phrase(elapsed_ms, locale)),
        Locale::En => format!("Updated {}", relative_phrase(elapsed_ms, locale)),
    }
}
