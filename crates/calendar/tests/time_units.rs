use ukcp_calendar::{Calendar, CalendarDate, CalendarError, TimeUnits};

#[test]
fn mid_month_points_360_day() {
    // UKCP monthly files put the time point on the 16th of each month.
    let units = TimeUnits::parse("hours since 1970-01-01 00:00:00", Calendar::Day360).unwrap();
    for month in 1..=12_u8 {
        let date = CalendarDate::new(2018, month, 16, Calendar::Day360).unwrap();
        let value = units.encode(date).unwrap();
        let back = units.decode(value).unwrap();
        assert_eq!(back, date, "month {month}");
    }
}

#[test]
fn gregorian_and_noleap_differ_after_leap_day() {
    let greg = TimeUnits::parse("days since 2000-01-01", Calendar::Standard).unwrap();
    let noleap = TimeUnits::parse("days since 2000-01-01", Calendar::NoLeap).unwrap();
    let a = greg.decode(60.0).unwrap();
    let b = noleap.decode(60.0).unwrap();
    assert_eq!((a.month(), a.day()), (3, 1));
    assert_eq!((b.month(), b.day()), (3, 2));
}

#[test]
fn seconds_and_minutes_steps() {
    let secs = TimeUnits::parse("seconds since 2000-01-01 00:00:00", Calendar::Day360).unwrap();
    assert_eq!(secs.decode(3600.0).unwrap().hour(), 1);
    let mins = TimeUnits::parse("minutes since 2000-01-01", Calendar::Day360).unwrap();
    assert_eq!(mins.decode(180.0).unwrap().hour(), 3);
}

#[test]
fn epoch_invalid_for_calendar() {
    assert!(matches!(
        TimeUnits::parse("days since 2001-02-29", Calendar::Standard),
        Err(CalendarError::InvalidDay { .. })
    ));
    assert!(TimeUnits::parse("days since 2001-02-30", Calendar::Day360).is_ok());
}

#[test]
fn unknown_calendar_name() {
    let err = "julian".parse::<Calendar>().unwrap_err();
    assert_eq!(err.to_string(), "unknown calendar: 'julian'");
}
