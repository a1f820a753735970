use chrono::{DateTime, FixedOffset, ParseError};

/// Publication dates are RFC 3339, e.g. `2023-06-01T09:30:00-07:00`.
pub fn parse_pub_date(buf: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(buf.trim())
}

pub fn format_date_time(date_time: &DateTime<FixedOffset>) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Joins the site base url and a `/`-prefixed relative path.
pub fn permalink(site_url: &str, pub_rel: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), pub_rel)
}
