//! 원격 콘솔 포트.
//!
//! 구현: `factorio-otel-network` crate (RCON over TCP)

use async_trait::async_trait;

use crate::error::CoreError;

/// 원격 콘솔 연결 팩토리
///
/// 수집 주기마다 새 연결을 연다. 연결은 주기 간에 재사용하지 않는다.
#[async_trait]
pub trait ConsoleConnector: Send + Sync {
    /// 새 세션 열기 (연결 + 인증)
    async fn connect(&self) -> Result<Box<dyn ConsoleSession>, CoreError>;
}

/// 인증된 원격 콘솔 세션
///
/// 세션은 연결 하나를 독점하며, drop 시 연결이 닫힌다.
#[async_trait]
pub trait ConsoleSession: Send {
    /// 명령 실행 후 응답 본문 반환
    async fn execute(&mut self, command: &str) -> Result<String, CoreError>;
}
