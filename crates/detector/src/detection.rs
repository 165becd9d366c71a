//! 탐지 단계 -- 레코드를 규칙에 평가하고 중복을 제거한 알림을 내보냅니다.
//!
//! [`DetectionStage`]는 레코드 채널에서 레코드를 받아 [`IndicatorSet`]의 모든 규칙을
//! 순서대로 평가합니다. 매칭된 알림은 [`AlertDeduplicator`]를 거쳐 처음 보는 경우에만
//! 알림 채널로 전송됩니다. 출력 순서는 (레코드 순서, 규칙 순서)입니다.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use procwatch_core::types::{Alert, Record};

use crate::error::DetectorError;
use crate::ioc::IndicatorSet;

/// 중복 제거 키: (규칙 이름, 사용자명, 명령줄)
type DedupKey = (String, String, String);

/// 실행 단위 알림 중복 제거기
///
/// 키 집합은 실행 동안 단조 증가하며 정리하지 않습니다.
#[derive(Debug, Default)]
pub struct AlertDeduplicator {
    seen: HashSet<DedupKey>,
}

impl AlertDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 처음 보는 알림이면 기록하고 `true`를 반환합니다.
    /// 이미 본 알림이면 `false`를 반환합니다.
    pub fn check_and_mark(&mut self, alert: &Alert) -> bool {
        self.seen.insert((
            alert.name.clone(),
            alert.username.clone(),
            alert.cmdline.clone(),
        ))
    }

    /// 기록된 키 수
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// 탐지 단계 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// 평가한 레코드 수
    pub records: u64,
    /// 규칙 매칭 수 (중복 포함)
    pub matches: u64,
    /// 중복으로 억제된 알림 수
    pub suppressed: u64,
    /// 전송한 알림 수
    pub alerts: u64,
}

/// 탐지 단계
pub struct DetectionStage {
    indicators: Arc<IndicatorSet>,
    dedup: AlertDeduplicator,
    stats: DetectionStats,
}

impl DetectionStage {
    /// 규칙 집합으로 새 탐지 단계를 생성합니다. 중복 제거 상태는 비어 있습니다.
    pub fn new(indicators: Arc<IndicatorSet>) -> Self {
        Self {
            indicators,
            dedup: AlertDeduplicator::new(),
            stats: DetectionStats::default(),
        }
    }

    /// 현재까지의 처리 통계
    pub fn stats(&self) -> DetectionStats {
        self.stats
    }

    /// 레코드 하나를 평가하고 중복이 아닌 알림을 규칙 순서대로 반환합니다.
    pub fn process(&mut self, record: &Record) -> Vec<Alert> {
        self.stats.records += 1;

        let mut fresh = Vec::new();
        for alert in self.indicators.evaluate(record) {
            self.stats.matches += 1;
            if self.dedup.check_and_mark(&alert) {
                fresh.push(alert);
            } else {
                self.stats.suppressed += 1;
                tracing::debug!(
                    rule = %alert.name,
                    username = %alert.username,
                    record_id = record.id,
                    "duplicate alert suppressed"
                );
            }
        }
        fresh
    }

    /// 레코드 채널이 닫힐 때까지 탐지를 수행합니다.
    ///
    /// 반환 시 알림 송신자가 해제되어 출력 단계에 종료가 전달됩니다.
    pub async fn run(
        mut self,
        mut records: mpsc::Receiver<Record>,
        alerts: mpsc::Sender<Alert>,
    ) -> Result<DetectionStats, DetectorError> {
        tracing::info!(rules = self.indicators.len(), "detection stage started");

        while let Some(record) = records.recv().await {
            for alert in self.process(&record) {
                alerts.send(alert).await.map_err(|_| {
                    tracing::error!("alert receiver closed");
                    DetectorError::Channel("alert receiver closed".to_owned())
                })?;
                self.stats.alerts += 1;
            }
        }

        tracing::info!(
            records = self.stats.records,
            matches = self.stats.matches,
            suppressed = self.stats.suppressed,
            alerts = self.stats.alerts,
            "finished processing log records"
        );
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioc::test_record;

    fn stage() -> DetectionStage {
        DetectionStage::new(Arc::new(IndicatorSet::default()))
    }

    #[test]
    fn dedup_marks_once() {
        let set = IndicatorSet::default();
        let alert = set
            .evaluate(&test_record("root", &["cat", "/etc/shadow"]))
            .remove(0);
        let mut dedup = AlertDeduplicator::new();
        assert!(dedup.is_empty());
        assert!(dedup.check_and_mark(&alert));
        assert!(!dedup.check_and_mark(&alert));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn dedup_key_separates_fields() {
        let set = IndicatorSet::default();
        let mut first = set
            .evaluate(&test_record("ab", &["cat", "/etc/passwd"]))
            .remove(0);
        let mut second = first.clone();
        first.username = "ab".to_owned();
        first.cmdline = "c".to_owned();
        second.username = "a".to_owned();
        second.cmdline = "bc".to_owned();

        let mut dedup = AlertDeduplicator::new();
        assert!(dedup.check_and_mark(&first));
        assert!(dedup.check_and_mark(&second));
    }

    #[test]
    fn repeated_record_yields_one_alert() {
        let mut stage = stage();
        let record = test_record("alice", &["cat", "/etc/passwd"]);
        assert_eq!(stage.process(&record).len(), 1);
        assert!(stage.process(&record).is_empty());

        let stats = stage.stats();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.suppressed, 1);
    }

    #[test]
    fn different_user_is_not_duplicate() {
        let mut stage = stage();
        assert_eq!(stage.process(&test_record("alice", &["cat", "/etc/passwd"])).len(), 1);
        assert_eq!(stage.process(&test_record("bob", &["cat", "/etc/passwd"])).len(), 1);
    }

    #[test]
    fn non_matching_record_yields_nothing() {
        let mut stage = stage();
        assert!(stage.process(&test_record("alice", &["echo", "hi"])).is_empty());
        assert_eq!(stage.stats().matches, 0);
    }

    #[tokio::test]
    async fn run_forwards_alerts_and_closes_channel() {
        let (record_tx, record_rx) = mpsc::channel(4);
        let (alert_tx, mut alert_rx) = mpsc::channel(4);

        let handle = tokio::spawn(stage().run(record_rx, alert_tx));

        record_tx
            .send(test_record("root", &["cat", "/etc/shadow"]))
            .await
            .unwrap();
        record_tx
            .send(test_record("root", &["cat", "/etc/shadow"]))
            .await
            .unwrap();
        record_tx
            .send(test_record("alice", &["ls"]))
            .await
            .unwrap();
        drop(record_tx);

        let alert = alert_rx.recv().await.unwrap();
        assert_eq!(alert.name, "Sensitive File Read");
        assert!(alert_rx.recv().await.is_none());

        let stats = handle.await.unwrap().unwrap();
        assert_eq!(
            stats,
            DetectionStats {
                records: 3,
                matches: 2,
                suppressed: 1,
                alerts: 1,
            }
        );
    }

    #[tokio::test]
    async fn run_fails_when_alert_receiver_dropped() {
        let (record_tx, record_rx) = mpsc::channel(1);
        let (alert_tx, alert_rx) = mpsc::channel(1);
        drop(alert_rx);

        record_tx
            .send(test_record("root", &["cat", "/etc/shadow"]))
            .await
            .unwrap();
        drop(record_tx);

        let err = stage().run(record_rx, alert_tx).await.unwrap_err();
        assert!(matches!(err, DetectorError::Channel(_)));
    }
}
