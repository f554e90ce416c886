//! OpenTelemetry 게이지 기록.
//!
//! `GaugeSink` 포트 구현. 계측기 13개를 시작 시 한 번 만들어 두고,
//! 기록할 때마다 속성만 바꿔 같은 계측기를 재사용한다.

use std::collections::HashMap;

use factorio_otel_core::attributes::Attribute;
use factorio_otel_core::models::telemetry::{Gauge, GaugeValue};
use factorio_otel_core::ports::telemetry::GaugeSink;
use opentelemetry::metrics::{self, Meter};
use opentelemetry::KeyValue;
use tracing::warn;

/// 계측 스코프 이름
pub const METER_NAME: &str = "factorio";

/// 값 타입별 계측기
enum Instrument {
    Int(metrics::Gauge<i64>),
    Float(metrics::Gauge<f64>),
}

/// OpenTelemetry 게이지 싱크: `GaugeSink` 포트 구현
pub struct OtelGaugeSink {
    instruments: HashMap<Gauge, Instrument>,
}

impl OtelGaugeSink {
    /// 주어진 미터에 계측기 13개 등록
    pub fn new(meter: &Meter) -> Self {
        let instruments = Gauge::ALL
            .iter()
            .map(|&gauge| {
                let instrument = if gauge.is_integer() {
                    Instrument::Int(meter.i64_gauge(gauge.name()).build())
                } else {
                    Instrument::Float(meter.f64_gauge(gauge.name()).build())
                };
                (gauge, instrument)
            })
            .collect();

        Self { instruments }
    }
}

/// 코어 속성 → OpenTelemetry `KeyValue`
pub fn to_key_values(attributes: &[Attribute]) -> Vec<KeyValue> {
    attributes
        .iter()
        .map(|attr| KeyValue::new(attr.key, attr.value.clone()))
        .collect()
}

impl GaugeSink for OtelGaugeSink {
    fn record(&self, gauge: Gauge, value: GaugeValue, attributes: &[Attribute]) {
        let attributes = to_key_values(attributes);
        match self.instruments.get(&gauge) {
            Some(Instrument::Int(instrument)) => instrument.record(value.as_i64(), &attributes),
            Some(Instrument::Float(instrument)) => instrument.record(value.as_f64(), &attributes),
            None => warn!("등록되지 않은 계측기: {gauge}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factorio_otel_core::attributes::name_attribute;
    use opentelemetry::metrics::MeterProvider;
    use opentelemetry::{Key, Value};
    use opentelemetry_sdk::metrics::SdkMeterProvider;

    #[test]
    fn registers_every_gauge() {
        let provider = SdkMeterProvider::builder().build();
        let sink = OtelGaugeSink::new(&provider.meter(METER_NAME));
        assert_eq!(sink.instruments.len(), Gauge::ALL.len());
    }

    #[test]
    fn maps_name_attribute() {
        let kvs = to_key_values(&[name_attribute("iron-plate")]);
        assert_eq!(kvs.len(), 1);
        assert_eq!(kvs[0].key, Key::from_static_str("name"));
        assert_eq!(kvs[0].value, Value::from("iron-plate".to_string()));
    }

    #[test]
    fn scalar_has_no_attributes() {
        assert!(to_key_values(&[]).is_empty());
    }

    #[test]
    fn records_without_exporter() {
        let provider = SdkMeterProvider::builder().build();
        let sink = OtelGaugeSink::new(&provider.meter(METER_NAME));

        sink.record(Gauge::Players, GaugeValue::Int(3), &[]);
        sink.record(Gauge::Evolution, GaugeValue::Float(0.42), &[]);
        sink.record(
            Gauge::ItemProduction,
            GaugeValue::Float(12.5),
            &[name_attribute("iron-plate")],
        );
        // 정수 계측기에 실수 값이 들어와도 절삭해서 기록
        sink.record(Gauge::Tick, GaugeValue::Float(100.9), &[]);
    }
}
