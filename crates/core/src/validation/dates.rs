//! Date parsing, calendar-age calculation, and cross-field date checks.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate};

/// Record key for death-date consistency errors.
pub const DEATH_DATE_FIELD: &str = "death_date";

/// Record key for marriage-date consistency errors.
pub const MARRIAGE_DATE_FIELD: &str = "marriage_date";

/// Minimum age at marriage checked by [`validate_date_consistency`].
pub const MIN_MARRIAGE_AGE: u32 = 18;

/// Legal minimum marriage age for the groom.
pub const MIN_GROOM_AGE: u32 = 21;

/// Legal minimum marriage age for the bride.
pub const MIN_BRIDE_AGE: u32 = 18;

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`; an RFC 3339 timestamp is also accepted and its date
/// part used. Surrounding whitespace is ignored.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Whole calendar years between `birth_date` and `as_of`.
///
/// The year difference is decremented when `as_of`'s month/day precedes the
/// birth month/day. Returns `None` when the birth date is absent or lies
/// after `as_of`.
pub fn calculate_age(birth_date: Option<NaiveDate>, as_of: NaiveDate) -> Option<u32> {
    let birth = birth_date?;
    if birth > as_of {
        return None;
    }
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// [`calculate_age`] evaluated against today's local calendar date.
pub fn calculate_age_today(birth_date: Option<NaiveDate>) -> Option<u32> {
    calculate_age(birth_date, chrono::Local::now().date_naive())
}

/// Cross-field consistency of life-event dates.
///
/// - a death date must be strictly after the birth date;
/// - the age reached on the marriage date must be at least
///   [`MIN_MARRIAGE_AGE`].
///
/// Only failing keys are present in the returned map. Checks involving an
/// absent date are skipped.
pub fn validate_date_consistency(
    birth_date: Option<NaiveDate>,
    death_date: Option<NaiveDate>,
    marriage_date: Option<NaiveDate>,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if let (Some(birth), Some(death)) = (birth_date, death_date) {
        if death <= birth {
            errors.insert(
                DEATH_DATE_FIELD.to_string(),
                "Date of death must be after date of birth".to_string(),
            );
        }
    }

    if let (Some(_), Some(marriage)) = (birth_date, marriage_date) {
        let old_enough =
            calculate_age(birth_date, marriage).map_or(false, |age| age >= MIN_MARRIAGE_AGE);
        if !old_enough {
            errors.insert(
                MARRIAGE_DATE_FIELD.to_string(),
                format!("Age on the date of marriage must be at least {MIN_MARRIAGE_AGE} years"),
            );
        }
    }

    errors
}

/// Check groom and bride meet their legal minimum ages on the marriage date.
///
/// Errors are keyed `groom_birth_date` / `bride_birth_date`.
pub fn validate_marriage_ages(
    groom_birth_date: Option<NaiveDate>,
    bride_birth_date: Option<NaiveDate>,
    marriage_date: Option<NaiveDate>,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let Some(marriage) = marriage_date else {
        return errors;
    };

    for (field, birth, min, who) in [
        ("groom_birth_date", groom_birth_date, MIN_GROOM_AGE, "Groom"),
        ("bride_birth_date", bride_birth_date, MIN_BRIDE_AGE, "Bride"),
    ] {
        if birth.is_none() {
            continue;
        }
        if calculate_age(birth, marriage).map_or(true, |age| age < min) {
            errors.insert(
                field.to_string(),
                format!("{who} must be at least {min} years old on the date of marriage"),
            );
        }
    }

    errors
}

/// Flag any of the given dated fields that lie after `today`.
pub fn validate_not_future(
    dates: &[(&str, Option<NaiveDate>)],
    today: NaiveDate,
) -> BTreeMap<String, String> {
    dates
        .iter()
        .filter_map(|(field, date)| match date {
            Some(d) if *d > today => Some((
                (*field).to_string(),
                "Date cannot be in the future".to_string(),
            )),
            _ => None,
        })
        .collect()
}
