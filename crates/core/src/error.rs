//! 에러 타입 - 도메인별 에러 정의

/// procwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ProcwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 단계 태스크 실패 (패닉, 중단 등)
    #[error("stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },

    /// 알림 직렬화 또는 출력 실패
    #[error("alert emission failed: {0}")]
    Emission(String),
}

/// 입력 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 입력 행 파싱 실패
    #[error("line {line}: {reason}")]
    Row { line: u64, reason: String },

    /// 입력 소스 읽기 실패
    #[error("cannot read input: {0}")]
    Unreadable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_display_includes_line() {
        let err = ParseError::Row {
            line: 7,
            reason: "invalid timestamp".to_owned(),
        };
        assert_eq!(err.to_string(), "line 7: invalid timestamp");
    }

    #[test]
    fn config_error_wraps_into_top_level() {
        let err: ProcwatchError = ConfigError::InvalidValue {
            field: "detector.channel_capacity".to_owned(),
            reason: "must be 1-1024".to_owned(),
        }
        .into();
        assert!(matches!(err, ProcwatchError::Config(_)));
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn stage_failed_display() {
        let err = PipelineError::StageFailed {
            stage: "parser".to_owned(),
            reason: "task panicked".to_owned(),
        };
        assert!(err.to_string().contains("parser"));
        assert!(err.to_string().contains("task panicked"));
    }
}
