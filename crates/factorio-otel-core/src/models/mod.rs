//! factorio-otel 도메인 모델.
//!
//! 수집 주기마다 새로 만들어지고 기록 직후 버려지는 값 타입들을 정의한다.

pub mod log_event;
pub mod stats;
pub mod telemetry;
