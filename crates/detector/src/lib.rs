#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: CSV 행을 `Record`로 정규화 (URL 디코딩, 타임스탬프, 정수 필드)
//! - [`ioc`]: 고정된 IOC 탐지 규칙 네 개와 규칙 집합
//! - [`detection`]: 규칙 평가 및 실행 단위 중복 제거
//! - [`emitter`]: 알림 JSON Lines 출력
//! - [`pipeline`]: 세 단계의 동시 실행 오케스트레이션
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod detection;
pub mod emitter;
pub mod error;
pub mod ioc;
pub mod parser;
pub mod pipeline;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{DetectionPipeline, DetectionPipelineBuilder, RunSummary};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::DetectorError;

// 파서
pub use parser::RecordReader;

// 탐지 규칙
pub use ioc::{
    IndicatorSet, MetadataServiceRead, SensitiveFileRead, SuspiciousDownload, WebCookieExport,
};

// 탐지/출력 단계
pub use detection::{AlertDeduplicator, DetectionStage, DetectionStats};
pub use emitter::AlertEmitter;
