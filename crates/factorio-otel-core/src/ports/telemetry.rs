//! 텔레메트리 출력 포트.
//!
//! 구현: `factorio-otel-telemetry` crate (OpenTelemetry)
//!
//! 기록/방출은 동기이며 실패하지 않는다. 내보내기 실패는 파이프라인이 처리한다.

use crate::attributes::Attribute;
use crate::models::log_event::LogEvent;
use crate::models::telemetry::{Gauge, GaugeValue};

/// 게이지 측정값 기록
pub trait GaugeSink: Send + Sync {
    /// 태그된 시리즈의 현재 값을 기록 (누적하지 않고 대체)
    fn record(&self, gauge: Gauge, value: GaugeValue, attributes: &[Attribute]);
}

/// 구조화 로그 이벤트 방출
pub trait EventSink: Send + Sync {
    /// 이벤트를 현재 시각의 로그 레코드로 방출
    fn emit(&self, event: &LogEvent);
}
