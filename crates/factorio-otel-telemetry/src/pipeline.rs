//! OTLP 내보내기 파이프라인.
//!
//! 메트릭은 수집 간격과 같은 주기의 PeriodicReader로, 로그는 배치 프로세서로 내보낸다.
//! 엔드포인트와 헤더는 표준 `OTEL_EXPORTER_OTLP_*` 환경변수를 따른다.

use std::time::Duration;

use opentelemetry::logs::LoggerProvider as _;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry_otlp::{LogExporter, MetricExporter};
use opentelemetry_sdk::logs::{Logger, LoggerProvider};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::runtime;
use thiserror::Error;
use tracing::{info, warn};

use crate::events::{OtelEventSink, LOGGER_NAME};
use crate::gauges::{OtelGaugeSink, METER_NAME};

/// 파이프라인 에러
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// 내보내기 초기화 실패 (시작 시 치명적)
    #[error("OTLP 내보내기 초기화 실패 ({signal}): {message}")]
    Exporter {
        signal: &'static str,
        message: String,
    },

    /// 종료 중 플러시 실패
    #[error("텔레메트리 종료 실패: {0}")]
    Shutdown(String),
}

/// 메트릭/로그 프로바이더 묶음
pub struct TelemetryPipeline {
    meter_provider: SdkMeterProvider,
    logger_provider: LoggerProvider,
}

impl TelemetryPipeline {
    /// OTLP gRPC 파이프라인 초기화
    ///
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn init(export_interval: Duration) -> Result<Self, TelemetryError> {
        let metric_exporter = MetricExporter::builder()
            .with_tonic()
            .build()
            .map_err(|e| TelemetryError::Exporter {
                signal: "metrics",
                message: e.to_string(),
            })?;
        let reader = PeriodicReader::builder(metric_exporter, runtime::Tokio)
            .with_interval(export_interval)
            .build();
        let meter_provider = SdkMeterProvider::builder().with_reader(reader).build();

        let log_exporter = LogExporter::builder()
            .with_tonic()
            .build()
            .map_err(|e| TelemetryError::Exporter {
                signal: "logs",
                message: e.to_string(),
            })?;
        let logger_provider = LoggerProvider::builder()
            .with_batch_exporter(log_exporter, runtime::Tokio)
            .build();

        info!("OTLP 파이프라인 초기화 (내보내기 간격 {:?})", export_interval);

        Ok(Self {
            meter_provider,
            logger_provider,
        })
    }

    pub fn meter(&self) -> Meter {
        self.meter_provider.meter(METER_NAME)
    }

    pub fn logger(&self) -> Logger {
        self.logger_provider.logger(LOGGER_NAME)
    }

    /// 게이지 싱크 생성
    pub fn gauge_sink(&self) -> OtelGaugeSink {
        OtelGaugeSink::new(&self.meter())
    }

    /// 이벤트 싱크 생성
    pub fn event_sink(&self) -> OtelEventSink<Logger> {
        OtelEventSink::new(self.logger())
    }

    /// 남은 데이터를 플러시하고 프로바이더 종료
    ///
    /// 둘 다 종료를 시도한 뒤 첫 번째 실패를 반환한다.
    /// 내부적으로 블로킹하므로 `spawn_blocking` 안에서 호출한다.
    pub fn shutdown(self) -> Result<(), TelemetryError> {
        let metrics = self.meter_provider.shutdown().map_err(|e| {
            warn!("메트릭 프로바이더 종료 실패: {e}");
            TelemetryError::Shutdown(format!("metrics: {e}"))
        });
        let logs = self.logger_provider.shutdown().map_err(|e| {
            warn!("로거 프로바이더 종료 실패: {e}");
            TelemetryError::Shutdown(format!("logs: {e}"))
        });

        metrics.and(logs)
    }
}
