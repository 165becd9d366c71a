//! 파이프라인 trait - 탐지 규칙 확장 포인트 정의

use crate::types::{Alert, AlertDetail, Finding, Record, Severity};

/// 침해 지표(IOC) 탐지 규칙이 구현하는 trait
///
/// `detect`는 상태를 변경하지 않으며, 매칭된 경우 규칙별 탐지 결과를 값으로 반환합니다.
/// 같은 규칙 인스턴스를 여러 레코드에 재사용해도 서로 영향을 주지 않습니다.
pub trait Indicator: Send + Sync {
    /// 규칙 이름
    fn name(&self) -> &str;

    /// 규칙 설명
    fn description(&self) -> &str;

    /// MITRE ATT&CK 기법 참조 문자열
    fn technique(&self) -> &str;

    /// 기본 심각도
    fn base_severity(&self) -> Severity;

    /// 레코드에 따른 심각도. 기본 구현은 `base_severity`를 반환합니다.
    fn severity_for(&self, _record: &Record) -> Severity {
        self.base_severity()
    }

    /// 레코드가 규칙에 매칭되는지 평가
    fn detect(&self, record: &Record) -> Option<Finding>;

    /// 매칭 결과로부터 알림을 생성
    fn alert(&self, record: &Record, finding: Finding) -> Alert {
        Alert {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            timestamp: record.timestamp,
            cmdline: record.command_line(),
            username: record.username.clone(),
            exit_code: record.exit_code,
            ppid: record.ppid,
            pid: record.pid,
            severity: self.severity_for(record),
            detail: AlertDetail {
                finding,
                mitre: self.technique().to_owned(),
                name: self.name().to_owned(),
                description: self.description().to_owned(),
            },
        }
    }
}
