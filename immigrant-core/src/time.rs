//! OFX date/time rendering.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::time::SystemTime;

/// Date-only OFX stamp, e.g. `20200325`.
pub fn ofx_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Second-precision OFX stamp, e.g. `20200325143000`.
pub fn ofx_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M%S").to_string()
}

/// Wall-clock time of a filesystem timestamp in the local timezone.
pub fn local_timestamp(t: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(t).naive_local()
}
