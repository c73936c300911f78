// format used when parsing stored dates, fractional seconds are optional, e.g. 2022-09-24T04:40:35.726029
pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// format used when writing dates, the fixed-width fraction keeps stored strings sortable
pub const DATE_WRITE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn format_date(date: chrono::NaiveDateTime) -> String {
    format!("{}", date.format(DATE_WRITE_FMT))
}

// accepts both the stored format and RFC 3339 timestamps with an offset
pub fn parse_date(str_time: &str) -> Option<chrono::NaiveDateTime> {
    if let Ok(date) = chrono::NaiveDateTime::parse_from_str(str_time, DATE_FMT) {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(str_time).ok().map(|d| d.naive_utc())
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, parse_date};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_date(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        parse_date(&str_time).ok_or_else(|| D::Error::custom(format!("invalid date {}", str_time)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use crate::utils::date::{DATE_FMT, format_date, parse_date};

    #[tokio::test]
    async fn test_should_parse_stored_and_rfc3339_dates() {
        let expected = NaiveDateTime::parse_from_str("2023-04-12T12:12:12.0", DATE_FMT).unwrap();
        assert_eq!(Some(expected), parse_date("2023-04-12T12:12:12"));
        assert_eq!(Some(expected), parse_date("2023-04-12T12:12:12.000000"));
        assert_eq!(Some(expected), parse_date("2023-04-12T12:12:12+00:00"));
        assert_eq!(Some(expected), parse_date("2023-04-12T14:12:12+02:00"));
        assert_eq!(None, parse_date("yesterday"));
    }

    #[tokio::test]
    async fn test_should_format_sortable_dates() {
        let early = NaiveDateTime::parse_from_str("2023-04-12T12:12:12.5", DATE_FMT).unwrap();
        let late = NaiveDateTime::parse_from_str("2023-04-12T12:12:13", DATE_FMT).unwrap();
        assert_eq!("2023-04-12T12:12:12.500000", format_date(early));
        assert!(format_date(early) < format_date(late));
        assert_eq!(Some(early), parse_date(&format_date(early)));
    }
}
