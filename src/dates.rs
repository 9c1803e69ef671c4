use time::format_description::FormatItem;
use time::macros::format_description;

/// Calendar dates travel as `YYYY-MM-DD` everywhere (query params, JSON).
pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

#[cfg(test)]
mod tests {
    use super::*;
    use time::Date;

    #[test]
    fn formats_and_parses_round_trip() {
        let date = Date::parse("2025-03-07", ISO_DATE).expect("parse");
        assert_eq!(date.to_string(), "2025-03-07");
        assert_eq!(date.format(ISO_DATE).expect("format"), "2025-03-07");
    }
}
