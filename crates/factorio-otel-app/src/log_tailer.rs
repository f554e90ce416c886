//! 로그 테일링 루프.
//!
//! 탐색 → 스트리밍 → 실패 → 대기 → 탐색 ... 을 종료 신호가 올 때까지 반복한다.
//! 모든 대기 지점에서 종료 신호를 관찰하며, 종료는 어느 상태에서든 즉시 루프를 끝낸다.

use std::sync::Arc;
use std::time::Duration;

use factorio_otel_core::classifier::classify;
use factorio_otel_core::error::CoreError;
use factorio_otel_core::ports::log_source::{LogStreamer, TargetDiscovery};
use factorio_otel_core::ports::telemetry::EventSink;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::lifecycle::cancelled;

/// 테일러 상태
#[derive(Debug)]
enum TailState {
    /// 대상 탐색 중
    Discovering,
    /// 선택된 대상의 로그를 읽는 중
    Streaming(String),
    /// 탐색 또는 스트림 실패
    Failed(CoreError),
    /// 재시도 전 고정 대기
    Backoff,
}

/// 로그 테일러
pub struct LogTailer {
    discovery: Arc<dyn TargetDiscovery>,
    streamer: Arc<dyn LogStreamer>,
    sink: Arc<dyn EventSink>,
    backoff: Duration,
}

impl LogTailer {
    pub fn new(
        discovery: Arc<dyn TargetDiscovery>,
        streamer: Arc<dyn LogStreamer>,
        sink: Arc<dyn EventSink>,
        backoff: Duration,
    ) -> Self {
        Self {
            discovery,
            streamer,
            sink,
            backoff,
        }
    }

    /// 종료 신호까지 테일링 반복
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("로그 테일러 시작: 재시도 대기 {:?}", self.backoff);

        let mut state = TailState::Discovering;
        loop {
            state = match state {
                TailState::Discovering => tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown_rx) => break,
                    result = self.discovery.find_target() => match result {
                        Ok(target) => {
                            info!("로그 대상 선택: {target}");
                            TailState::Streaming(target)
                        }
                        Err(e) => TailState::Failed(e),
                    },
                },
                TailState::Streaming(target) => tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown_rx) => break,
                    e = self.stream(&target) => TailState::Failed(e),
                },
                TailState::Failed(e) => {
                    warn!("로그 테일링 실패: {e} ({:?} 후 재시도)", self.backoff);
                    TailState::Backoff
                }
                TailState::Backoff => tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown_rx) => break,
                    _ = tokio::time::sleep(self.backoff) => TailState::Discovering,
                },
            };
        }

        info!("로그 테일러 종료");
    }

    /// 스트림을 끝까지 읽으며 이벤트 방출
    ///
    /// 항상 실패로 끝난다. 원격에서 정상 종료해도 `StreamEnded`.
    async fn stream(&self, target: &str) -> CoreError {
        let mut lines = match self.streamer.open_log_stream(target).await {
            Ok(lines) => lines,
            Err(e) => return e,
        };

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    if let Some(event) = classify(&line) {
                        debug!("로그 이벤트: {}", event.kind());
                        self.sink.emit(&event);
                    }
                }
                Err(e) => return e,
            }
        }

        CoreError::StreamEnded(format!("{target} 로그 스트림이 닫힘"))
    }
}
