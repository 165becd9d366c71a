//! 탐지 파이프라인 에러 타입
//!
//! [`DetectorError`]는 파싱, 탐지, 출력 단계에서 발생하는 모든 에러를 표현합니다.
//! `From<DetectorError> for ProcwatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.
//!
//! 모든 에러는 실행을 중단시키는 치명적 에러입니다. 재시도 대상 에러는 없습니다.

use procwatch_core::error::{ConfigError, ParseError, PipelineError, ProcwatchError};

/// 탐지 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// 입력 행 파싱 실패
    #[error("parse error: line {line}: {reason}")]
    Parse {
        /// 1부터 시작하는 입력 줄 번호
        line: u64,
        /// 실패 사유
        reason: String,
    },

    /// CSV 판독 실패 (필드 수 불일치, 읽기 실패 등)
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// 알림 직렬화 실패
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 출력 싱크 쓰기 실패
    #[error("sink error: {0}")]
    Sink(std::io::Error),

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// 단계 태스크 실패 (패닉, 중단)
    #[error("stage '{stage}' failed: {reason}")]
    Task {
        /// 단계 이름 (parser, detection, emission)
        stage: &'static str,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<DetectorError> for ProcwatchError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::Parse { line, reason } => ParseError::Row { line, reason }.into(),
            DetectorError::Csv(e) => match e.position() {
                Some(pos) => ParseError::Row {
                    line: pos.line(),
                    reason: e.to_string(),
                }
                .into(),
                None => ParseError::Unreadable(e.to_string()).into(),
            },
            DetectorError::Serialize(e) => PipelineError::Emission(e.to_string()).into(),
            DetectorError::Sink(e) => PipelineError::Emission(e.to_string()).into(),
            DetectorError::Channel(reason) => PipelineError::ChannelSend(reason).into(),
            DetectorError::Task { stage, reason } => PipelineError::StageFailed {
                stage: stage.to_owned(),
                reason,
            }
            .into(),
            DetectorError::Config { field, reason } => {
                ConfigError::InvalidValue { field, reason }.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = DetectorError::Parse {
            line: 3,
            reason: "invalid timestamp '2024-13-01'".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("invalid timestamp"));
    }

    #[test]
    fn task_error_display() {
        let err = DetectorError::Task {
            stage: "emission",
            reason: "task was cancelled".to_owned(),
        };
        assert_eq!(err.to_string(), "stage 'emission' failed: task was cancelled");
    }

    #[test]
    fn converts_parse_to_core_parse_error() {
        let err: ProcwatchError = DetectorError::Parse {
            line: 9,
            reason: "empty command".to_owned(),
        }
        .into();
        assert!(matches!(err, ProcwatchError::Parse(ParseError::Row { line: 9, .. })));
    }

    #[test]
    fn converts_config_to_core_config_error() {
        let err: ProcwatchError = DetectorError::Config {
            field: "channel_capacity".to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into();
        assert!(matches!(err, ProcwatchError::Config(_)));
    }

    #[test]
    fn converts_sink_to_emission_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ProcwatchError = DetectorError::Sink(io).into();
        assert!(matches!(
            err,
            ProcwatchError::Pipeline(PipelineError::Emission(_))
        ));
    }
}
