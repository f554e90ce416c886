//! 설정 및 DI 와이어링 통합 테스트.
//!
//! AppConfig → 어댑터 생성 검증.

use factorio_otel_core::config::AppConfig;
use factorio_otel_core::models::telemetry::{Gauge, GaugeValue};
use factorio_otel_core::ports::console::ConsoleConnector;
use factorio_otel_core::ports::log_source::{LogStreamer, TargetDiscovery};
use factorio_otel_core::ports::telemetry::{EventSink, GaugeSink};
use factorio_otel_network::kube_client::KubeClient;
use factorio_otel_network::rcon::RconConnector;
use factorio_otel_telemetry::events::{OtelEventSink, LOGGER_NAME};
use factorio_otel_telemetry::gauges::{OtelGaugeSink, METER_NAME};
use opentelemetry::logs::LoggerProvider as _;
use opentelemetry::metrics::MeterProvider as _;
use opentelemetry_sdk::logs::LoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    assert!(config.validate().is_ok());

    // RCON 설정
    assert!(!config.rcon.host.is_empty());
    assert!(config.rcon.port > 0);
    assert!(config.rcon.dial_timeout() > Duration::ZERO);
    assert!(config.rcon.io_timeout() > Duration::ZERO);

    // 수집 설정
    assert!(config.collector.interval_ms > 0);

    // 로그 테일링 설정
    assert_eq!(config.tail_backoff(), Duration::from_secs(5));
    assert!(config.log_tail.api_base.starts_with("https://"));
}

#[test]
fn all_adapters_instantiate_from_config() {
    let mut config = AppConfig::default_config();
    // 클러스터 밖에서는 CA가 없으므로 검증 생략 경로
    config.log_tail.ca_path = "/nonexistent/ca.crt".into();

    let connector: Arc<dyn ConsoleConnector> = Arc::new(RconConnector::from_config(&config.rcon));

    let kube = Arc::new(KubeClient::new(&config.log_tail).unwrap());
    let _discovery: Arc<dyn TargetDiscovery> = kube.clone();
    let _streamer: Arc<dyn LogStreamer> = kube;

    let meter_provider = SdkMeterProvider::builder().build();
    let gauges: Arc<dyn GaugeSink> =
        Arc::new(OtelGaugeSink::new(&meter_provider.meter(METER_NAME)));
    gauges.record(Gauge::Players, GaugeValue::Int(0), &[]);

    let logger_provider = LoggerProvider::builder().build();
    let _events: Arc<dyn EventSink> =
        Arc::new(OtelEventSink::new(logger_provider.logger(LOGGER_NAME)));

    drop(connector);
}

#[test]
fn invalid_ca_bundle_is_config_error() {
    let mut ca = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut ca, b"not a certificate").unwrap();

    let mut config = AppConfig::default_config();
    config.log_tail.ca_path = ca.path().to_path_buf();

    let err = KubeClient::new(&config.log_tail).err().unwrap();
    assert!(err.to_string().contains("설정"));
}
