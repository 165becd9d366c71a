//! 탐지 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`DetectorConfig`](procwatch_core::config::DetectorConfig)를
//! 기반으로 파이프라인 실행에 필요한 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use procwatch_core::config::ProcwatchConfig;
//! use procwatch_detector::config::PipelineConfig;
//!
//! let core_config = ProcwatchConfig::default();
//! let config = PipelineConfig::from_core(&core_config.detector);
//! ```

use serde::{Deserialize, Serialize};

use procwatch_core::config::MAX_CHANNEL_CAPACITY;

use crate::error::DetectorError;

/// 표준 출력을 의미하는 출력 경로
pub const STDOUT_PATH: &str = "-";

/// 탐지 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 입력 CSV 경로 (비어 있으면 호출자가 입력을 지정)
    pub input_path: String,
    /// 알림 출력 경로 (`-`는 표준 출력)
    pub output_path: String,
    /// 단계 간 채널 용량
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: STDOUT_PATH.to_owned(),
            channel_capacity: 1,
        }
    }
}

impl PipelineConfig {
    /// core의 `DetectorConfig`에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &procwatch_core::config::DetectorConfig) -> Self {
        Self {
            input_path: core.input_path.clone(),
            output_path: core.output_path.clone(),
            channel_capacity: core.channel_capacity,
        }
    }

    /// 출력 대상이 표준 출력인지 확인합니다.
    pub fn writes_to_stdout(&self) -> bool {
        self.output_path == STDOUT_PATH
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.channel_capacity == 0 || self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(DetectorError::Config {
                field: "channel_capacity".to_owned(),
                reason: format!("must be between 1 and {MAX_CHANNEL_CAPACITY}"),
            });
        }

        if self.output_path.is_empty() {
            return Err(DetectorError::Config {
                field: "output_path".to_owned(),
                reason: "must not be empty (use \"-\" for stdout)".to_owned(),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 입력 경로를 설정합니다.
    pub fn input_path(mut self, path: impl Into<String>) -> Self {
        self.config.input_path = path.into();
        self
    }

    /// 출력 경로를 설정합니다.
    pub fn output_path(mut self, path: impl Into<String>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// 채널 용량을 설정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, DetectorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
