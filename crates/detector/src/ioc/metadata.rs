//! 클라우드 메타데이터 서비스 조회 탐지

use procwatch_core::pipeline::Indicator;
use procwatch_core::types::{Finding, Record, Severity};

use super::RuleIdentity;
use super::matching::{is_web_request, parse_request_uri};

/// EC2 인스턴스 메타데이터 주소
pub const EC2_METADATA_ADDR: &str = "169.254.169.254";
/// ECS 태스크 메타데이터 주소
pub const ECS_METADATA_ADDR: &str = "169.254.170.2";

const IDENTITY: RuleIdentity = RuleIdentity {
    name: "Metadata Service Read",
    description: "An attempt has been made to read potentially sensitive information from the cloud metadata service",
    technique: "T1552.005",
};

/// 웹 요청 명령으로 메타데이터 서비스 주소에 접근하는 행위를 탐지합니다.
///
/// 서비스 주소가 처음 나타난 토큰부터 요청 URI(절대 URI 또는 절대 경로)로
/// 파싱되는 첫 토큰의 경로를 기록합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataServiceRead;

impl MetadataServiceRead {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for MetadataServiceRead {
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
        Severity::Low
    }

    fn detect(&self, record: &Record) -> Option<Finding> {
        if !is_web_request(record) {
            return None;
        }

        let mut service = None;
        for token in &record.cmdline {
            if token.contains(EC2_METADATA_ADDR) {
                service = Some("EC2");
            } else if token.contains(ECS_METADATA_ADDR) {
                service = Some("ECS");
            }

            let Some(current) = service else {
                continue;
            };
            if let Some(uri) = parse_request_uri(token) {
                let path = match uri.path() {
                    "" => "/",
                    path => path,
                };
                return Some(Finding::MetadataRead {
                    path: path.to_owned(),
                    service: current.to_owned(),
                });
            }
        }
        None
    }
}
