/*!
 * Field transforms for the encoded date and time values of a backup.
 *
 * Each transform takes the raw value and whether the destination is a
 * spreadsheet. Spreadsheet destinations get native date/time values; text
 * destinations get ISO-style strings. `None` means the value could not be
 * interpreted and should be passed through unchanged.
 */

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta};

use crate::database::Value;

const MILLIS_PER_SECOND: i64 = 1000;

/// `DD-MM-YYYY` text date
pub fn day_month_year(value: &Value, excel: bool) -> Option<Value> {
    let text = value.as_text()?.trim();
    let date = NaiveDate::parse_from_str(text, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()?;

    Some(render_date(date, excel))
}

/// `HH:MM` text time, where `24:00` means midnight
pub fn hour_minute(value: &Value, excel: bool) -> Option<Value> {
    let text = value.as_text()?.trim();
    let text = match text.strip_prefix("24:") {
        Some(rest) => format!("00:{}", rest),
        None => text.to_string(),
    };
    let time = NaiveTime::parse_from_str(&text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M:%S"))
        .ok()?;

    if excel {
        Some(Value::Time(time))
    } else {
        Some(Value::Text(time.format("%H:%M:%S").to_string()))
    }
}

/// Milliseconds since the Unix epoch, keeping the (UTC) date
pub fn epoch_date(value: &Value, excel: bool) -> Option<Value> {
    let secs = value.as_millis()?.div_euclid(MILLIS_PER_SECOND);
    let date = DateTime::from_timestamp(secs, 0)?.date_naive();

    Some(render_date(date, excel))
}

/// Milliseconds since midnight, keeping the time of day
pub fn epoch_time_of_day(value: &Value, excel: bool) -> Option<Value> {
    let secs = value.as_millis()?.div_euclid(MILLIS_PER_SECOND);

    if excel {
        return Some(Value::Duration(secs));
    }

    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    let moment = midnight.checked_add_signed(TimeDelta::try_seconds(secs)?)?;
    Some(Value::Text(moment.format("%H:%M").to_string()))
}

fn render_date(date: NaiveDate, excel: bool) -> Value {
    if excel {
        Value::Date(date)
    } else {
        Value::Text(date.format("%Y-%m-%d").to_string())
    }
}
