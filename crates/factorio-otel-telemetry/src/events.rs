//! 로그 이벤트 방출.
//!
//! `EventSink` 포트 구현. 이벤트 종류를 본문으로, 필드를 속성으로 담은
//! 로그 레코드를 현재 시각으로 방출한다.

use std::time::SystemTime;

use factorio_otel_core::models::log_event::LogEvent;
use factorio_otel_core::ports::telemetry::EventSink;
use opentelemetry::logs::{AnyValue, LogRecord, Logger};
use tracing::debug;

/// 로거 스코프 이름
pub const LOGGER_NAME: &str = "factorio-metrics";

/// 방출 직전의 레코드 내용
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// 이벤트 종류 (`chat`, `join` ...)
    pub body: &'static str,
    /// 이벤트 필드
    pub attributes: Vec<(&'static str, String)>,
}

impl EventRecord {
    pub fn from_event(event: &LogEvent) -> Self {
        Self {
            body: event.kind(),
            attributes: event
                .fields()
                .into_iter()
                .map(|(key, value)| (key, value.to_string()))
                .collect(),
        }
    }
}

/// OpenTelemetry 로그 싱크: `EventSink` 포트 구현
pub struct OtelEventSink<L> {
    logger: L,
}

impl<L: Logger> OtelEventSink<L> {
    pub fn new(logger: L) -> Self {
        Self { logger }
    }
}

impl<L> EventSink for OtelEventSink<L>
where
    L: Logger + Send + Sync,
{
    fn emit(&self, event: &LogEvent) {
        let content = EventRecord::from_event(event);
        debug!("이벤트 방출: {} {:?}", content.body, content.attributes);

        let mut record = self.logger.create_log_record();
        record.set_body(AnyValue::from(content.body.to_string()));
        for (key, value) in content.attributes {
            record.add_attribute(key, value);
        }
        record.set_timestamp(SystemTime::now());
        self.logger.emit(record);
    }
}
