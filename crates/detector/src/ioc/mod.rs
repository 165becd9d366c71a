//! IOC 탐지 규칙 모듈
//!
//! 고정된 네 가지 침해 지표 규칙과 이를 순서대로 보관하는 [`IndicatorSet`]을 제공합니다.
//! 각 규칙은 core의 [`Indicator`] trait을 구현하며 상태를 갖지 않습니다.
//!
//! # 규칙 순서
//! 1. [`MetadataServiceRead`] (T1552.005, Low)
//! 2. [`WebCookieExport`] (T1552.001, Medium)
//! 3. [`SensitiveFileRead`] (T1003.008, High / Critical)
//! 4. [`SuspiciousDownload`] (T1059, T1082, T1592, High)

pub mod cookie;
pub mod download;
pub mod matching;
pub mod metadata;
pub mod sensitive_file;

pub use cookie::WebCookieExport;
pub use download::SuspiciousDownload;
pub use metadata::MetadataServiceRead;
pub use sensitive_file::SensitiveFileRead;

use procwatch_core::pipeline::Indicator;
use procwatch_core::types::{Alert, Record};

/// 규칙 식별 정보 (이름, 설명, 기법 참조)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleIdentity {
    pub name: &'static str,
    pub description: &'static str,
    pub technique: &'static str,
}

/// 순서가 고정된 탐지 규칙 집합
///
/// 규칙은 상태가 없으므로 하나의 집합을 모든 레코드에 재사용합니다.
pub struct IndicatorSet {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorSet {
    /// 빈 규칙 집합을 생성합니다.
    pub fn new() -> Self {
        Self {
            indicators: Vec::new(),
        }
    }

    /// 기본 규칙 네 개로 집합을 생성합니다.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Box::new(MetadataServiceRead::new()))
            .register(Box::new(WebCookieExport::new()))
            .register(Box::new(SensitiveFileRead::new()))
            .register(Box::new(SuspiciousDownload::new()))
    }

    /// 규칙을 등록합니다. 등록 순서대로 평가됩니다.
    pub fn register(mut self, indicator: Box<dyn Indicator>) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// 규칙 수
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    /// 규칙이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// 규칙을 평가 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Indicator> {
        self.indicators.iter().map(|indicator| indicator.as_ref())
    }

    /// 레코드를 모든 규칙에 평가하여 매칭된 알림을 규칙 순서대로 반환합니다.
    ///
    /// 중복 제거는 적용하지 않습니다.
    pub fn evaluate(&self, record: &Record) -> Vec<Alert> {
        self.iter()
            .filter_map(|indicator| {
                indicator
                    .detect(record)
                    .map(|finding| indicator.alert(record, finding))
            })
            .collect()
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
pub(crate) fn test_record(username: &str, cmdline: &[&str]) -> Record {
    use chrono::TimeZone;

    Record {
        id: 1,
        timestamp: chrono::Utc
            .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .unwrap(),
        cmdline: cmdline.iter().map(|s| (*s).to_owned()).collect(),
        username: username.to_owned(),
        exit_code: 0,
        ppid: 1,
        pid: 4242,
        auid: 1000,
        uid: 1000,
        gid: 1000,
        euid: 1000,
        suid: 1000,
        fsuid: 1000,
        egid: 1000,
        sgid: 1000,
        fsgid: 1000,
    }
}
