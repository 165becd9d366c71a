//! 출력 단계 -- 알림을 JSON Lines로 직렬화하여 싱크에 기록합니다.
//!
//! 알림 하나당 한 줄의 JSON 객체를 기록합니다. 직렬화 또는 쓰기 실패는 치명적입니다.
//! 알림 채널이 닫히면 싱크를 flush하고 기록한 알림 수를 반환하며,
//! 이것이 전체 실행의 완료 신호가 됩니다.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, info};

use procwatch_core::types::Alert;

use crate::error::DetectorError;

/// 알림 출력기
pub struct AlertEmitter<W> {
    sink: W,
    emitted: u64,
}

impl<W> AlertEmitter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self { sink, emitted: 0 }
    }

    /// 알림을 JSON 한 줄(개행 제외)로 직렬화합니다.
    pub fn serialize(alert: &Alert) -> Result<String, DetectorError> {
        Ok(serde_json::to_string(alert)?)
    }

    /// 지금까지 기록한 알림 수
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// 알림 하나를 기록합니다.
    pub async fn emit(&mut self, alert: &Alert) -> Result<(), DetectorError> {
        let mut line = Self::serialize(alert)?;
        line.push('\n');
        self.sink
            .write_all(line.as_bytes())
            .await
            .map_err(DetectorError::Sink)?;
        self.emitted += 1;
        Ok(())
    }

    /// 버퍼에 남은 출력을 싱크로 내보냅니다.
    pub async fn flush(&mut self) -> Result<(), DetectorError> {
        self.sink.flush().await.map_err(DetectorError::Sink)
    }

    /// 알림 채널이 닫힐 때까지 알림을 기록합니다.
    pub async fn run(mut self, mut alerts: mpsc::Receiver<Alert>) -> Result<u64, DetectorError> {
        info!("emission stage started");
        while let Some(alert) = alerts.recv().await {
            if let Err(e) = self.emit(&alert).await {
                error!(error = %e, rule = %alert.name, "failed to emit alert");
                return Err(e);
            }
        }
        self.flush().await?;
        info!(alerts = self.emitted, "finished sending security alerts");
        Ok(self.emitted)
    }

    /// 내부 싱크를 돌려받습니다.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
