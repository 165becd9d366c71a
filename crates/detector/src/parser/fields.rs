//! 필드 디코딩 -- 타임스탬프, 정수, URL 인코딩된 명령줄

use chrono::{DateTime, NaiveDateTime, Utc};

/// 입력 타임스탬프 형식 (항상 UTC, `+00` 접미사 고정)
///
/// 초 뒤의 소수부(`.123456`)는 있어도 되고 없어도 됩니다.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f+00";

/// 고정 형식 타임스탬프를 UTC 시각으로 파싱합니다.
pub fn parse_timestamp(field: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{field}': {e}"))
}

/// 정수 필드를 파싱합니다. 앞뒤 공백은 허용하지 않습니다.
pub fn parse_int(field: &str, column: &str) -> Result<i64, String> {
    field
        .parse::<i64>()
        .map_err(|e| format!("invalid integer in column '{column}': '{field}': {e}"))
}

/// 쿼리 문자열 규칙으로 디코딩합니다.
///
/// `+`는 공백이 되고 `%XX`는 해당 바이트로 디코딩됩니다.
/// 잘못된 `%` 이스케이프나 UTF-8이 아닌 결과는 에러입니다.
pub fn query_unescape(field: &str) -> Result<String, String> {
    let bytes = field.as_bytes();
    let mut idx = 0;
    while let Some(offset) = bytes[idx..].iter().position(|b| *b == b'%') {
        let at = idx + offset;
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let escape: String = field[at..].chars().take(3).collect();
            return Err(format!("invalid URL escape \"{escape}\""));
        }
        idx = at + 3;
    }

    let spaced = field.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| format!("decoded command is not valid UTF-8: {e}"))
}

/// URL 인코딩된 명령 필드를 토큰 목록으로 변환합니다.
///
/// 디코딩 후 공백 문자 기준으로 분리하며, 토큰이 없으면 에러입니다.
pub fn decode_command(field: &str) -> Result<Vec<String>, String> {
    let decoded = query_unescape(field)?;
    let tokens: Vec<String> = decoded.split_whitespace().map(str::to_owned).collect();
    if tokens.is_empty() {
        return Err("empty command".to_owned());
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_parses_as_utc() {
        let ts = parse_timestamp("2024-01-15 12:30:45+00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap());
    }

    #[test]
    fn timestamp_accepts_fractional_seconds() {
        let ts = parse_timestamp("2021-05-04 17:46:36.123456+00").unwrap();
        let expected = Utc.with_ymd_and_hms(2021, 5, 4, 17, 46, 36).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(ts, expected);

        let ts = parse_timestamp("2021-05-04 17:46:36.5+00").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn timestamp_rejects_other_layouts() {
        assert!(parse_timestamp("2024-01-15T12:30:45Z").is_err());
        assert!(parse_timestamp("2024-01-15 12:30:45").is_err());
        assert!(parse_timestamp("2024-13-15 12:30:45+00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn int_accepts_signed_values() {
        assert_eq!(parse_int("-1", "auid").unwrap(), -1);
        assert_eq!(parse_int("4294967295", "auid").unwrap(), 4_294_967_295);
    }

    #[test]
    fn int_error_names_column() {
        let err = parse_int("abc", "ppid").unwrap_err();
        assert!(err.contains("ppid"));
        assert!(parse_int(" 5", "pid").is_err());
    }

    #[test]
    fn unescape_plus_and_percent() {
        assert_eq!(query_unescape("cat+%2Fetc%2Fpasswd").unwrap(), "cat /etc/passwd");
        assert_eq!(query_unescape("a%2Bb").unwrap(), "a+b");
        assert_eq!(query_unescape("plain").unwrap(), "plain");
    }

    #[test]
    fn unescape_rejects_malformed_escape() {
        assert!(query_unescape("100%").is_err());
        assert!(query_unescape("%2").is_err());
        let err = query_unescape("bad%zzescape").unwrap_err();
        assert!(err.contains("%zz"));
    }

    #[test]
    fn unescape_rejects_invalid_utf8() {
        assert!(query_unescape("%ff%fe").is_err());
    }

    #[test]
    fn decode_command_splits_on_whitespace() {
        let tokens = decode_command("curl++-s%09https%3A%2F%2Fexample.com").unwrap();
        assert_eq!(tokens, vec!["curl", "-s", "https://example.com"]);
    }

    #[test]
    fn decode_command_rejects_blank() {
        assert!(decode_command("").is_err());
        assert!(decode_command("+++").is_err());
    }
}
