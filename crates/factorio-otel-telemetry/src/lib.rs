//! # factorio-otel-telemetry
//!
//! 텔레메트리 어댑터.
//! 코어의 `GaugeSink`/`EventSink` 포트를 OpenTelemetry 계측기와 로거로 구현하고,
//! OTLP(gRPC) 내보내기 파이프라인을 구성한다.

pub mod events;
pub mod gauges;
pub mod pipeline;
