//! # factorio-otel
//!
//! Factorio 서버 텔레메트리 에이전트 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 수집기/로그 테일러 태스크 실행, 종료 처리.

mod collector;
mod lifecycle;
mod log_tailer;
mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use factorio_otel_network::kube_client::KubeClient;
use factorio_otel_network::rcon::RconConnector;
use factorio_otel_telemetry::pipeline::TelemetryPipeline;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::collector::MetricsCollector;
use crate::lifecycle::LifecycleManager;
use crate::log_tailer::LogTailer;
use crate::settings::{load_script, EnvSettings};

/// Factorio 서버 텔레메트리 에이전트
///
/// RCON으로 게임 통계를 수집하고 서버 로그를 이벤트로 분류해 OTLP로 내보낸다.
#[derive(Parser, Debug)]
#[command(name = "factorio-otel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화 (RUST_LOG 우선)
    let log_filter = format!(
        "factorio_otel={},factorio_otel_core={},factorio_otel_network={},factorio_otel_telemetry={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    // 설정 로드 (실패 시 즉시 종료)
    let config = EnvSettings::from_env()?.into_config()?;
    let script = load_script(&config.collector.script_path)?;
    let interval = config.collect_interval();

    // ── 텔레메트리 파이프라인 ──
    let pipeline =
        TelemetryPipeline::init(interval).context("텔레메트리 파이프라인 초기화 실패")?;
    let gauges = Arc::new(pipeline.gauge_sink());
    let events = Arc::new(pipeline.event_sink());

    // ── 어댑터 생성 (DI 와이어링) ──
    let connector = Arc::new(RconConnector::from_config(&config.rcon));
    let kube = Arc::new(
        KubeClient::new(&config.log_tail).context("Kubernetes 클라이언트 생성 실패")?,
    );

    let collector = MetricsCollector::new(connector, gauges, &script);
    let tailer = LogTailer::new(kube.clone(), kube, events, config.tail_backoff());

    // ── 태스크 실행 ──
    let lifecycle = LifecycleManager::new();

    let collector_rx = lifecycle.subscribe();
    let collector_task =
        tokio::spawn(async move { collector.run(interval, collector_rx).await });

    let tailer_rx = lifecycle.subscribe();
    let tailer_task = tokio::spawn(async move { tailer.run(tailer_rx).await });

    info!(
        "factorio-otel 시작 (간격={:?}, rcon={}, 대상={}/{})",
        interval,
        config.rcon.address(),
        config.log_tail.namespace,
        config.log_tail.pod_label
    );

    if let Err(e) = lifecycle.wait_for_signal().await {
        error!("시그널 핸들러 등록 실패: {e}");
        lifecycle.shutdown();
    }

    info!("종료 중...");
    for (name, task) in [("수집기", collector_task), ("로그 테일러", tailer_task)] {
        if let Err(e) = task.await {
            warn!("{name} 태스크 비정상 종료: {e}");
        }
    }

    // 남은 메트릭/로그 플러시
    tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .context("텔레메트리 종료 태스크 실패")??;

    info!("factorio-otel 종료");
    Ok(())
}
