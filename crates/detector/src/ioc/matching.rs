//! 규칙 공통 매칭 헬퍼

use url::Url;

use procwatch_core::types::Record;

/// 웹 요청 명령
pub const WEB_REQUEST_COMMANDS: &[&str] = &["wget", "curl"];

/// 파일 접근 명령
pub const FILE_READ_COMMANDS: &[&str] = &[
    "cat", "cmp", "ls", "less", "cp", "mv", "chmod", "chown", "find",
];

/// 값이 목록의 항목 중 하나와 정확히 같은지 확인합니다.
pub fn is_one_of(value: &str, list: &[&str]) -> bool {
    list.iter().any(|item| value == *item)
}

/// 값이 목록의 항목 중 하나를 부분 문자열로 포함하는지 확인합니다.
pub fn contains_one_of(value: &str, list: &[&str]) -> bool {
    list.iter().any(|item| value.contains(item))
}

/// 값이 목록의 항목 중 하나로 끝나는지 확인합니다.
pub fn suffix_one_of(value: &str, list: &[&str]) -> bool {
    list.iter().any(|item| value.ends_with(item))
}

/// sudo를 제외한 첫 토큰이 웹 요청 명령인지 확인합니다.
pub fn is_web_request(record: &Record) -> bool {
    first_command_in(record, WEB_REQUEST_COMMANDS)
}

/// sudo를 제외한 첫 토큰이 파일 접근 명령인지 확인합니다.
pub fn is_file_read(record: &Record) -> bool {
    first_command_in(record, FILE_READ_COMMANDS)
}

fn first_command_in(record: &Record, list: &[&str]) -> bool {
    record
        .stripped_cmdline()
        .first()
        .is_some_and(|cmd| is_one_of(cmd, list))
}

/// 절대 경로 토큰을 파싱할 때 쓰는 기준 URI. 호스트가 없습니다.
const PATH_ONLY_BASE: &str = "request:/";

/// 토큰을 요청 URI로 파싱합니다.
///
/// 허용: `scheme:/...` 형태의 절대 URI, `/`로 시작하는 절대 경로 (호스트 없음).
/// 거부: 스킴 없는 상대 참조, `Metadata:true` 같은 불투명 URI,
/// `http:host/path`처럼 스킴 뒤가 `/`로 시작하지 않는 토큰, `//`로 시작하는 토큰.
pub fn parse_request_uri(token: &str) -> Option<Url> {
    if let Some(rest) = token.strip_prefix('/') {
        if rest.starts_with('/') {
            return None;
        }
        return Url::parse(PATH_ONLY_BASE).ok()?.join(token).ok();
    }

    let (_, after_scheme) = token.split_once(':')?;
    if !after_scheme.starts_with('/') {
        return None;
    }
    let uri = Url::parse(token).ok()?;
    if uri.cannot_be_a_base() {
        return None;
    }
    Some(uri)
}

/// 호스트 문자열. 포트가 명시된 경우 `host:port` 형태입니다.
///
/// 스킴의 기본 포트(`http`의 80 등)는 URI 정규화 과정에서 제거되므로 붙지 않습니다.
/// 절대 경로 토큰은 빈 문자열입니다.
pub fn host_with_port(uri: &Url) -> String {
    let host = uri.host_str().unwrap_or_default();
    match uri.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}
