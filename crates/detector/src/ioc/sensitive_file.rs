//! 민감 파일 읽기 탐지

use procwatch_core::pipeline::Indicator;
use procwatch_core::types::{Finding, Record, Severity};

use super::RuleIdentity;
use super::matching::{contains_one_of, is_file_read};

/// 민감 경로 패턴 (부분 문자열 매칭)
pub const SENSITIVE_PATHS: &[&str] = &[
    "/etc/passwd",
    "/etc/shadow",
    "/etc/gshadow",
    "/proc/",
    "/sys/",
];

const IDENTITY: RuleIdentity = RuleIdentity {
    name: "Sensitive File Read",
    description: "An attempt has been made to read sensitive files",
    technique: "T1003.008",
};

/// 파일 접근 명령으로 계정 정보나 커널 인터페이스 파일을 읽는 행위를 탐지합니다.
///
/// root 사용자 또는 sudo로 실행된 경우 심각도가 Critical로 상승합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct SensitiveFileRead;

impl SensitiveFileRead {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for SensitiveFileRead {
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
        Severity::High
    }

    fn severity_for(&self, record: &Record) -> Severity {
        if record.username == "root" || record.is_sudo() {
            Severity::Critical
        } else {
            self.base_severity()
        }
    }

    fn detect(&self, record: &Record) -> Option<Finding> {
        if !is_file_read(record) {
            return None;
        }
        record
            .cmdline
            .iter()
            .find(|token| contains_one_of(token, SENSITIVE_PATHS))
            .map(|token| Finding::SensitiveFileRead {
                file_path: token.clone(),
            })
    }
}
