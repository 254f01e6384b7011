use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

/// Format used by the backend's DATETIME columns (`fecha_inicio`, `fecha_final`).
pub fn format_db_datetime(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| String::new())
}

/// Format used for `fecha_hora_pausa`: ISO 8601 in UTC with millisecond
/// precision, e.g. `2024-05-02T09:15:07.123Z`.
pub fn format_iso_datetime(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .unwrap_or_else(|_| format_db_datetime(at))
}

/// Parse a timestamp coming back from the backend.
///
/// Accepts `2024-05-02T09:15:00`, `2024-05-02 09:15:00` and full RFC 3339
/// (the offset is dropped, the backend stores naive UTC). Returns `None` for
/// anything else.
pub fn parse_backend_datetime(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = at.to_offset(UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }
    // Fractional seconds are not interesting for audit timestamps.
    let raw = raw.split('.').next().unwrap_or(raw);
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
    })
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn db_format_is_space_separated_utc() {
        let at = datetime!(2024-05-02 11:15:07 +02:00);
        assert_eq!(format_db_datetime(at), "2024-05-02 09:15:07");
    }

    #[test]
    fn iso_format_always_has_three_fraction_digits() {
        let at = datetime!(2024-05-02 11:15:07.123456789 +02:00);
        assert_eq!(format_iso_datetime(at), "2024-05-02T09:15:07.123Z");

        let whole = datetime!(2024-05-02 09:15:07 UTC);
        assert_eq!(format_iso_datetime(whole), "2024-05-02T09:15:07.000Z");
    }

    #[test]
    fn parses_backend_variants() {
        let expected = datetime!(2024-05-02 09:15:07);
        assert_eq!(parse_backend_datetime("2024-05-02T09:15:07"), Some(expected));
        assert_eq!(parse_backend_datetime("2024-05-02 09:15:07"), Some(expected));
        assert_eq!(
            parse_backend_datetime("2024-05-02T09:15:07.123456"),
            Some(expected)
        );
        assert_eq!(
            parse_backend_datetime("2024-05-02T11:15:07+02:00"),
            Some(expected)
        );
        assert_eq!(parse_backend_datetime(""), None);
        assert_eq!(parse_backend_datetime("ayer"), None);
    }
}
