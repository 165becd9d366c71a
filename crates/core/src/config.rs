//! 설정 관리 - procwatch.toml 파싱 및 런타임 설정
//!
//! [`ProcwatchConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`PROCWATCH_DETECTOR_CHANNEL_CAPACITY=4` 형식)
//! 3. 설정 파일 (`procwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), procwatch_core::error::ProcwatchError> {
//! use procwatch_core::config::ProcwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ProcwatchConfig::load("procwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ProcwatchConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ProcwatchError};

/// 채널 용량 상한
pub const MAX_CHANNEL_CAPACITY: usize = 1024;

/// procwatch 통합 설정
///
/// `procwatch.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 탐지 파이프라인 설정
    #[serde(default)]
    pub detector: DetectorConfig,
}

impl ProcwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ProcwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 기본값에 환경변수 오버라이드만 적용한 설정을 만듭니다.
    ///
    /// 설정 파일 없이 실행할 때 사용합니다.
    pub fn from_env() -> Result<Self, ProcwatchError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ProcwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ProcwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ProcwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            ProcwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PROCWATCH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "PROCWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PROCWATCH_GENERAL_LOG_FORMAT");

        override_string(
            &mut self.detector.input_path,
            "PROCWATCH_DETECTOR_INPUT_PATH",
        );
        override_string(
            &mut self.detector.output_path,
            "PROCWATCH_DETECTOR_OUTPUT_PATH",
        );
        override_usize(
            &mut self.detector.channel_capacity,
            "PROCWATCH_DETECTOR_CHANNEL_CAPACITY",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ProcwatchError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.detector.channel_capacity == 0
            || self.detector.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::InvalidValue {
                field: "detector.channel_capacity".to_owned(),
                reason: format!("must be 1-{MAX_CHANNEL_CAPACITY}"),
            }
            .into());
        }

        if self.detector.output_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "detector.output_path".to_owned(),
                reason: "must not be empty (use \"-\" for stdout)".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 탐지 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// 입력 CSV 경로 (비어 있으면 CLI 인자 필요)
    pub input_path: String,
    /// 알림 출력 경로 ("-"는 표준 출력)
    pub output_path: String,
    /// 단계 간 채널 용량 (1이면 단일 슬롯 핸드오프)
    pub channel_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: "-".to_owned(),
            channel_capacity: 1,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
