//! 파이프라인 오케스트레이션 -- 파싱/탐지/출력 단계를 동시에 실행합니다.
//!
//! [`DetectionPipeline`]은 세 단계를 bounded mpsc 채널로 연결합니다.
//! CSV 판독은 동기 I/O이므로 파서는 블로킹 스레드 풀에서 실행되고,
//! 탐지와 출력은 비동기 태스크로 실행됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! RecordReader (blocking) -> mpsc<Record> -> DetectionStage -> mpsc<Alert> -> AlertEmitter -> sink
//! ```
//!
//! 각 채널에는 송신자와 수신자가 하나씩만 있으므로 입력 순서가 끝까지 보존됩니다.
//! 한 단계가 실패하면 첫 에러가 즉시 반환되고 나머지 단계는 중단됩니다.

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use procwatch_core::types::{Alert, Record};

use crate::config::PipelineConfig;
use crate::detection::DetectionStage;
use crate::emitter::AlertEmitter;
use crate::error::DetectorError;
use crate::ioc::IndicatorSet;
use crate::parser::RecordReader;

/// 한 번의 실행 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 파싱한 레코드 수
    pub records: u64,
    /// 규칙 매칭 수 (중복 포함)
    pub matches: u64,
    /// 중복으로 억제된 알림 수
    pub suppressed: u64,
    /// 출력한 알림 수
    pub alerts: u64,
}

/// 탐지 파이프라인
///
/// 규칙 집합은 상태가 없으므로 같은 파이프라인으로 여러 번 실행할 수 있으며,
/// 중복 제거 상태는 실행마다 새로 시작합니다.
///
/// # 사용 예시
/// ```ignore
/// use procwatch_detector::DetectionPipelineBuilder;
///
/// let pipeline = DetectionPipelineBuilder::new().config(config).build()?;
/// let input = std::fs::File::open("exec.csv")?;
/// let summary = pipeline.run(input, tokio::io::stdout()).await?;
/// ```
pub struct DetectionPipeline {
    config: PipelineConfig,
    indicators: Arc<IndicatorSet>,
}

impl DetectionPipeline {
    /// 파이프라인 설정
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 등록된 규칙 집합
    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// 입력 전체를 처리하고 알림을 싱크에 기록합니다.
    ///
    /// 출력 단계가 싱크를 flush한 뒤에 반환합니다.
    pub async fn run<R, W>(&self, input: R, sink: W) -> Result<RunSummary, DetectorError>
    where
        R: Read + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let capacity = self.config.channel_capacity;
        let (record_tx, record_rx) = mpsc::channel::<Record>(capacity);
        let (alert_tx, alert_rx) = mpsc::channel::<Alert>(capacity);

        tracing::info!(
            rules = self.indicators.len(),
            channel_capacity = capacity,
            "starting detection pipeline"
        );

        let parser = tokio::task::spawn_blocking(move || RecordReader::new(input).run(record_tx));
        let detection = tokio::spawn(
            DetectionStage::new(Arc::clone(&self.indicators)).run(record_rx, alert_tx),
        );
        let emission = tokio::spawn(AlertEmitter::new(sink).run(alert_rx));

        let abort_handles = [
            parser.abort_handle(),
            detection.abort_handle(),
            emission.abort_handle(),
        ];

        let joined = tokio::try_join!(
            join_stage("parser", parser),
            join_stage("detection", detection),
            join_stage("emission", emission),
        );

        match joined {
            Ok((records, stats, alerts)) => {
                let summary = RunSummary {
                    records,
                    matches: stats.matches,
                    suppressed: stats.suppressed,
                    alerts,
                };
                tracing::info!(
                    records = summary.records,
                    alerts = summary.alerts,
                    suppressed = summary.suppressed,
                    "detection pipeline finished"
                );
                Ok(summary)
            }
            Err(e) => {
                for handle in &abort_handles {
                    handle.abort();
                }
                tracing::error!(error = %e, "detection pipeline aborted");
                Err(e)
            }
        }
    }
}

async fn join_stage<T>(
    stage: &'static str,
    handle: JoinHandle<Result<T, DetectorError>>,
) -> Result<T, DetectorError> {
    handle.await.map_err(|e| DetectorError::Task {
        stage,
        reason: e.to_string(),
    })?
}

/// 탐지 파이프라인 빌더
pub struct DetectionPipelineBuilder {
    config: PipelineConfig,
    indicators: Option<IndicatorSet>,
}

impl DetectionPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            indicators: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 채널 용량을 지정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 규칙 집합을 지정합니다. 지정하지 않으면 기본 규칙 네 개를 사용합니다.
    pub fn indicators(mut self, indicators: IndicatorSet) -> Self {
        self.indicators = Some(indicators);
        self
    }

    /// 설정을 검증하고 파이프라인을 생성합니다.
    pub fn build(self) -> Result<DetectionPipeline, DetectorError> {
        self.config.validate()?;
        Ok(DetectionPipeline {
            config: self.config,
            indicators: Arc::new(self.indicators.unwrap_or_default()),
        })
    }
}

impl Default for DetectionPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
