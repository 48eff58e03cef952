//! DATE-TIME forms (RFC 5545 §3.3.5).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{RfcError, RfcResult};

/// The three DATE-TIME forms of RFC 5545 §3.3.5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeForm {
    /// Form 2: UTC time with `Z` suffix.
    Utc,
    /// Form 3: local time with a `TZID` parameter.
    Zoned { tzid: String },
    /// Form 1: floating local time.
    Floating,
}

/// A parsed DATE-TIME value with its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcalDateTime {
    pub naive: NaiveDateTime,
    pub form: DateTimeForm,
}

impl IcalDateTime {
    /// Resolves this value to an instant.
    ///
    /// Floating times are interpreted as UTC; zoned times use the named IANA
    /// timezone, taking the earliest mapping across DST gaps.
    ///
    /// ## Errors
    /// Returns an error if the `TZID` is not a known IANA identifier.
    pub fn to_utc(&self) -> RfcResult<DateTime<Utc>> {
        match &self.form {
            DateTimeForm::Utc | DateTimeForm::Floating => {
                Ok(Utc.from_utc_datetime(&self.naive))
            }
            DateTimeForm::Zoned { tzid } => {
                let tz: Tz = tzid
                    .parse()
                    .map_err(|_| RfcError::UnknownTimezone(tzid.clone()))?;
                tz.from_local_datetime(&self.naive)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or_else(|| RfcError::UnknownTimezone(tzid.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn utc_form_resolves_directly() {
        let dt = IcalDateTime {
            naive: naive(2025, 8, 26, 14, 30),
            form: DateTimeForm::Utc,
        };
        assert_eq!(dt.to_utc().unwrap().to_rfc3339(), "2025-08-26T14:30:00+00:00");
    }

    #[test]
    fn zoned_form_applies_offset() {
        let dt = IcalDateTime {
            naive: naive(2025, 1, 15, 9, 0),
            form: DateTimeForm::Zoned {
                tzid: "Europe/Oslo".to_string(),
            },
        };
        // Oslo is UTC+1 in January
        assert_eq!(dt.to_utc().unwrap().to_rfc3339(), "2025-01-15T08:00:00+00:00");
    }

    #[test]
    fn unknown_tzid_is_an_error() {
        let dt = IcalDateTime {
            naive: naive(2025, 1, 15, 9, 0),
            form: DateTimeForm::Zoned {
                tzid: "Atlantis/Lost".to_string(),
            },
        };
        assert!(matches!(dt.to_utc(), Err(RfcError::UnknownTimezone(_))));
    }
}
