//! 도메인 타입 - 시스템 전역에서 사용되는 공통 타입
//!
//! 파서가 만드는 [`Record`], 탐지 규칙이 만드는 [`Alert`]와 [`Finding`],
//! 그리고 심각도 [`Severity`]를 정의합니다.
//! 모든 타입은 값 타입이며 단계 사이에서 소유권 이동으로 전달됩니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 프로세스 실행 로그 레코드
///
/// 입력 CSV의 한 행에서 정규화된 이벤트입니다.
/// `cmdline`은 URL 디코딩 후 공백으로 분리한 토큰 목록이며,
/// 탐지 단계에 도달한 레코드에서는 항상 비어 있지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 이벤트 ID
    pub id: i64,
    /// 실행 시각 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 명령줄 토큰
    pub cmdline: Vec<String>,
    /// 실행 사용자명
    pub username: String,
    /// 종료 코드
    pub exit_code: i64,
    /// 부모 프로세스 ID
    pub ppid: i64,
    /// 프로세스 ID
    pub pid: i64,
    /// audit user id
    pub auid: i64,
    pub uid: i64,
    pub gid: i64,
    pub euid: i64,
    pub suid: i64,
    pub fsuid: i64,
    pub egid: i64,
    pub sgid: i64,
    pub fsgid: i64,
}

impl Record {
    /// 명령줄 토큰을 공백 하나로 이어 붙인 문자열을 반환합니다.
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }

    /// 첫 토큰이 `sudo`이면 이를 제외한 토큰 슬라이스를 반환합니다.
    pub fn stripped_cmdline(&self) -> &[String] {
        match self.cmdline.split_first() {
            Some((first, rest)) if first == "sudo" => rest,
            _ => &self.cmdline,
        }
    }

    /// 원본 명령줄이 `sudo`로 시작하는지 확인합니다.
    pub fn is_sudo(&self) -> bool {
        self.cmdline.first().is_some_and(|t| t == "sudo")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {} pid={}: {}",
            self.id,
            self.timestamp.to_rfc3339(),
            self.username,
            self.pid,
            self.command_line(),
        )
    }
}

/// 심각도 레벨
///
/// `Informational < Low < Medium < High < Critical` 순서를 가지며,
/// 직렬화 시 0~4 정수로 표현됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// 정보성 이벤트
    #[default]
    Informational = 0,
    /// 낮은 심각도
    Low = 1,
    /// 중간 심각도
    Medium = 2,
    /// 높은 심각도
    High = 3,
    /// 치명적 - 즉시 대응 필요
    Critical = 4,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" | "informational" => Some(Self::Informational),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 정수 레벨(0~4)에서 심각도를 만듭니다.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Informational),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Critical),
            _ => None,
        }
    }

    /// 정수 레벨을 반환합니다.
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Informational => write!(f, "Informational"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        Self::from_level(level).ok_or_else(|| {
            serde::de::Error::custom(format!("severity level out of range: {level}"))
        })
    }
}

/// 규칙별 탐지 결과
///
/// 탐지 규칙의 `detect`가 매칭 시 반환하는 값입니다.
/// 알림의 `detail` 객체에 규칙 식별 정보와 함께 평탄화되어 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Finding {
    /// 클라우드 메타데이터 서비스 조회
    MetadataRead {
        /// 요청 경로
        path: String,
        /// 메타데이터 서비스 종류 (EC2, ECS)
        service: String,
    },
    /// 웹 세션 쿠키 내보내기
    CookieExport {
        /// 쿠키 출처 호스트
        cookie_source: String,
        /// 쿠키가 저장된 경로
        #[serde(rename = "export_filepath")]
        export_path: String,
    },
    /// 민감 파일 읽기
    SensitiveFileRead {
        /// 참조된 파일 경로
        #[serde(rename = "filepath")]
        file_path: String,
    },
    /// 의심스러운 원격 파일 다운로드
    SuspiciousDownload {
        /// 다운로드 파일명
        #[serde(rename = "filename")]
        file_name: String,
        /// 다운로드 URL 토큰
        url: String,
    },
}

/// 알림 상세 정보 - 탐지 결과와 규칙 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDetail {
    /// 규칙별 탐지 결과
    #[serde(flatten)]
    pub finding: Finding,
    /// MITRE ATT&CK 기법 참조
    pub mitre: String,
    /// 규칙 이름
    pub name: String,
    /// 규칙 설명
    pub description: String,
}

/// 보안 알림
///
/// 탐지 규칙에 매칭된 레코드에서 생성됩니다.
/// 필드 순서가 곧 직렬화 순서입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// 규칙 이름
    pub name: String,
    /// 상세 설명
    pub description: String,
    /// 원본 레코드 시각
    pub timestamp: DateTime<Utc>,
    /// 공백으로 이어 붙인 명령줄
    pub cmdline: String,
    /// 실행 사용자명
    pub username: String,
    /// 종료 코드
    pub exit_code: i64,
    /// 부모 프로세스 ID
    pub ppid: i64,
    /// 프로세스 ID
    pub pid: i64,
    /// 심각도
    pub severity: Severity,
    /// 규칙별 상세 정보
    pub detail: AlertDetail,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (user: {}, cmd: {})",
            self.severity, self.name, self.username, self.cmdline,
        )
    }
}
