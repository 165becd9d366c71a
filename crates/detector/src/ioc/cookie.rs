//! 웹 세션 쿠키 내보내기 탐지

use procwatch_core::pipeline::Indicator;
use procwatch_core::types::{Finding, Record, Severity};

use super::RuleIdentity;
use super::matching::{host_with_port, is_one_of, is_web_request, parse_request_uri};

/// 다음 토큰을 쿠키 저장 경로로 받는 curl 옵션
pub const COOKIE_EXPORT_FLAGS: &[&str] = &["-b", "--cookie-jar"];

const IDENTITY: RuleIdentity = RuleIdentity {
    name: "Web Cookie Export",
    description: "An attempt has been made to export web session cookies",
    technique: "T1552.001",
};

/// curl로 원격 호스트의 쿠키를 파일로 내보내는 행위를 탐지합니다.
///
/// 쿠키 출처 호스트와 저장 경로가 모두 확인되는 즉시 매칭됩니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebCookieExport;

impl WebCookieExport {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for WebCookieExport {
    fn name(&self) -> &str {
        IDENTITY.name
    }

    fn description(&self) -> &str {
        IDENTITY.description
    }

    fn technique(&self) -> &str {
        IDENTITY.technique
    }

    fn base_severity(&self) -> Severity {
        Severity::Medium
    }

    fn detect(&self, record: &Record) -> Option<Finding> {
        let is_curl = record
            .stripped_cmdline()
            .first()
            .is_some_and(|cmd| cmd == "curl");
        if !is_web_request(record) || !is_curl {
            return None;
        }

        let mut cookie_source = String::new();
        let mut export_path = String::new();
        for (idx, token) in record.cmdline.iter().enumerate() {
            if token.contains("http") {
                if let Some(uri) = parse_request_uri(token) {
                    cookie_source = host_with_port(&uri);
                }
            }
            if is_one_of(token, COOKIE_EXPORT_FLAGS) {
                if let Some(next) = record.cmdline.get(idx + 1) {
                    export_path = next.clone();
                }
            }
            if !cookie_source.is_empty() && !export_path.is_empty() {
                return Some(Finding::CookieExport {
                    cookie_source,
                    export_path,
                });
            }
        }
        None
    }
}
