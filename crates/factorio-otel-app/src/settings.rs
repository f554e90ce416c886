//! 환경변수 설정 로드.
//!
//! 시작 시 한 번 환경변수를 읽어 [`AppConfig`]로 변환한다.
//! 값이 비어 있으면 설정되지 않은 것으로 보고 기본값을 쓴다.

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use factorio_otel_core::config::AppConfig;
use serde::Deserialize;

/// 환경변수 원본 값 (키는 소문자로 정규화됨)
#[derive(Debug, Default, Deserialize)]
pub struct EnvSettings {
    pub rcon_host: Option<String>,
    pub rcon_port: Option<String>,
    pub rcon_password: Option<String>,
    pub collect_interval: Option<String>,
    pub lua_script_path: Option<String>,
    pub factorio_pod_label: Option<String>,
    pub factorio_namespace: Option<String>,
    pub log_tail_backoff: Option<String>,
    pub kubernetes_service_host: Option<String>,
    pub kubernetes_service_port: Option<String>,
}

impl EnvSettings {
    /// 프로세스 환경변수에서 로드
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::default())
    }

    /// 주어진 환경 소스에서 로드
    pub fn from_source(source: Environment) -> Result<Self> {
        Config::builder()
            .add_source(source.ignore_empty(true))
            .build()
            .context("환경변수 읽기 실패")?
            .try_deserialize()
            .context("환경변수 해석 실패")
    }

    /// 기본값을 채우고 검증된 설정으로 변환
    pub fn into_config(self) -> Result<AppConfig> {
        let mut config = AppConfig::default_config();

        if let Some(host) = self.rcon_host {
            config.rcon.host = host;
        }
        if let Some(port) = self.rcon_port {
            config.rcon.port = port
                .trim()
                .parse()
                .with_context(|| format!("RCON_PORT 값이 올바르지 않음: {port:?}"))?;
        }
        if let Some(password) = self.rcon_password {
            config.rcon.password = password;
        }
        if let Some(interval) = self.collect_interval {
            config.collector.interval_ms = parse_millis("COLLECT_INTERVAL", &interval)?;
        }
        if let Some(path) = self.lua_script_path {
            config.collector.script_path = path.into();
        }
        if let Some(label) = self.factorio_pod_label {
            config.log_tail.pod_label = label;
        }
        if let Some(namespace) = self.factorio_namespace {
            config.log_tail.namespace = namespace;
        }
        if let Some(backoff) = self.log_tail_backoff {
            config.log_tail.backoff_ms = parse_millis("LOG_TAIL_BACKOFF", &backoff)?;
        }
        if let (Some(host), Some(port)) =
            (self.kubernetes_service_host, self.kubernetes_service_port)
        {
            config.log_tail.api_base = api_base_url(host.trim(), port.trim());
        }

        config.validate()?;
        Ok(config)
    }
}

/// 클러스터 API 주소 조립 (IPv6 리터럴은 대괄호로 감쌈)
fn api_base_url(host: &str, port: &str) -> String {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(addr)) => format!("https://[{addr}]:{port}"),
        _ => format!("https://{host}:{port}"),
    }
}

/// humantime 형식 기간(`15s`, `1m30s`) → 밀리초
fn parse_millis(key: &str, value: &str) -> Result<u64> {
    let duration: Duration = humantime::parse_duration(value.trim())
        .with_context(|| format!("{key} 기간 형식이 올바르지 않음: {value:?}"))?;
    match u64::try_from(duration.as_millis()) {
        Ok(ms) => Ok(ms),
        Err(_) => bail!("{key} 값이 너무 큼: {value:?}"),
    }
}

/// 원격에서 실행할 수집 스크립트 로드
pub fn load_script(path: &Path) -> Result<String> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("수집 스크립트 읽기 실패: {}", path.display()))?;
    if script.trim().is_empty() {
        bail!("수집 스크립트가 비어 있음: {}", path.display());
    }
    Ok(script)
}
