//! 메트릭 수집 루프.
//!
//! 고정 주기마다 원격 콘솔에 새로 접속해 수집 스크립트를 실행하고,
//! 응답을 디코딩해 게이지로 기록한다. 한 주기의 실패는 그 주기만 버린다.

use std::sync::Arc;
use std::time::Duration;

use factorio_otel_core::attributes::name_attribute;
use factorio_otel_core::decoder::decode_stats;
use factorio_otel_core::error::CoreError;
use factorio_otel_core::models::stats::{NamedValues, StatsSnapshot};
use factorio_otel_core::models::telemetry::{Gauge, GaugeValue};
use factorio_otel_core::ports::console::ConsoleConnector;
use factorio_otel_core::ports::telemetry::GaugeSink;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::lifecycle::cancelled;

/// 스크립트를 출력 없이 실행하는 콘솔 지시어
pub const SILENT_COMMAND_PREFIX: &str = "/sc ";

/// 메트릭 수집기
pub struct MetricsCollector {
    connector: Arc<dyn ConsoleConnector>,
    sink: Arc<dyn GaugeSink>,
    command: String,
}

impl MetricsCollector {
    pub fn new(
        connector: Arc<dyn ConsoleConnector>,
        sink: Arc<dyn GaugeSink>,
        script: &str,
    ) -> Self {
        Self {
            connector,
            sink,
            command: format!("{SILENT_COMMAND_PREFIX}{script}"),
        }
    }

    /// 매 주기 전송하는 명령
    pub fn command(&self) -> &str {
        &self.command
    }

    /// 종료 신호까지 수집 반복
    ///
    /// 첫 수집은 즉시 실행된다. 느린 주기 뒤에 밀린 틱은 따라잡지 않고 건너뛴다.
    pub async fn run(&self, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        info!("메트릭 수집 시작: 간격 {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancelled(&mut shutdown_rx) => break,
                _ = ticker.tick() => {}
            }

            // 주기 도중 취소되면 진행 중인 세션은 drop으로 닫힌다
            tokio::select! {
                biased;
                _ = cancelled(&mut shutdown_rx) => break,
                result = self.collect_once() => match result {
                    Ok(recorded) => debug!("수집 완료: 측정값 {recorded}개"),
                    Err(e) => warn!("수집 주기 실패: {e}"),
                },
            }
        }

        info!("메트릭 수집 루프 종료");
    }

    /// 한 주기 수집
    ///
    /// 성공 시 기록한 측정값 수 반환
    pub async fn collect_once(&self) -> Result<usize, CoreError> {
        let raw = {
            let mut session = self.connector.connect().await?;
            session.execute(&self.command).await?
        };

        let snapshot = decode_stats(&raw)?;
        Ok(self.record_snapshot(&snapshot))
    }

    /// 스냅샷의 모든 값을 기록
    fn record_snapshot(&self, snapshot: &StatsSnapshot) -> usize {
        let scalars = [
            (Gauge::Players, GaugeValue::Int(snapshot.players)),
            (Gauge::Evolution, GaugeValue::Float(snapshot.evolution)),
            (Gauge::Tick, GaugeValue::Int(snapshot.tick)),
            (Gauge::RocketsLaunched, GaugeValue::Int(snapshot.rockets_launched)),
            (Gauge::ResearchProgress, GaugeValue::Float(snapshot.research_progress)),
        ];
        for (gauge, value) in scalars {
            self.sink.record(gauge, value, &[]);
        }

        let mappings: [(Gauge, &NamedValues); 8] = [
            (Gauge::ItemProduction, &snapshot.item_production),
            (Gauge::ItemConsumption, &snapshot.item_consumption),
            (Gauge::FluidProduction, &snapshot.fluid_production),
            (Gauge::FluidConsumption, &snapshot.fluid_consumption),
            (Gauge::PowerProduction, &snapshot.power_production),
            (Gauge::PowerConsumption, &snapshot.power_consumption),
            (Gauge::KillCount, &snapshot.kill_counts),
            (Gauge::EntityBuilt, &snapshot.entity_built),
        ];

        let mut recorded = scalars.len();
        for (gauge, values) in mappings {
            for (name, value) in values {
                self.sink
                    .record(gauge, GaugeValue::Float(*value), &[name_attribute(name)]);
                recorded += 1;
            }
        }
        recorded
    }
}
