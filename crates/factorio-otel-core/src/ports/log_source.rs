//! 로그 소스 포트.
//!
//! 구현: `factorio-otel-network` crate (Kubernetes API, reqwest)

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::CoreError;

/// 로그 라인 스트림 (follow 모드, 줄 단위)
pub type LogLineStream = Pin<Box<dyn Stream<Item = Result<String, CoreError>> + Send>>;

/// 로그를 읽을 대상 탐색
#[async_trait]
pub trait TargetDiscovery: Send + Sync {
    /// 셀렉터에 맞는 첫 번째 대상의 이름 반환
    ///
    /// 후보가 없으면 `CoreError::NotFound`.
    async fn find_target(&self) -> Result<String, CoreError>;
}

/// 대상의 로그 스트림 열기
#[async_trait]
pub trait LogStreamer: Send + Sync {
    /// 현재 시점부터의 로그를 계속 읽는 스트림 열기 (과거 로그 없음)
    async fn open_log_stream(&self, target: &str) -> Result<LogLineStream, CoreError>;
}
