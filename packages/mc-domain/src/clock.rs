use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Milliseconds since the Unix epoch, the unit every stored timestamp uses.
pub fn now_ms() -> i64 {
	to_ms(OffsetDateTime::now_utc())
}

pub fn to_ms(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Parses an RFC 3339 instant into epoch milliseconds.
pub fn parse_rfc3339_ms(raw: &str) -> Option<i64> {
	OffsetDateTime::parse(raw.trim(), &Rfc3339).ok().map(to_ms)
}
