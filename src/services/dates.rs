use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::pricing::nights_between;

/// A validated check-in/check-out pair. Construction goes through
/// [`validate_date_range`], so `check_out > check_in` always holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn nights(&self) -> u32 {
        nights_between(self.check_in, self.check_out)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Both check-in and check-out dates are required")]
    MissingDates,
    #[error("Check-in date cannot be in the past")]
    CheckInInPast,
    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,
    #[error("Booking must be for at least 1 night")]
    StayTooShort,
    #[error("Booking cannot exceed {max_nights} nights")]
    StayTooLong { max_nights: u32 },
}

/// Checks a proposed stay against "today" and the property's stay-length
/// policy. Rules run in order and the first failure wins. `today` is passed
/// in (normalized to a calendar date by the caller) so this stays a pure
/// function.
pub fn validate_date_range(
    today: NaiveDate,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    max_nights: u32,
) -> Result<DateRange, DateRangeError> {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Err(DateRangeError::MissingDates);
    };
    if check_in < today {
        return Err(DateRangeError::CheckInInPast);
    }
    if check_out <= check_in {
        return Err(DateRangeError::CheckOutNotAfterCheckIn);
    }
    let nights = nights_between(check_in, check_out);
    if nights < 1 {
        return Err(DateRangeError::StayTooShort);
    }
    if nights > max_nights {
        return Err(DateRangeError::StayTooLong { max_nights });
    }
    Ok(DateRange {
        check_in,
        check_out,
    })
}
