//! 애플리케이션 설정 구조체.
//!
//! RCON 접속 정보, 수집 주기, 로그 테일링 대상 등 런타임 설정을 정의한다.
//! 환경변수 로드는 `factorio-otel-app`의 settings 모듈이 담당한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 원격 콘솔(RCON) 설정
    pub rcon: RconConfig,
    /// 메트릭 수집 설정
    pub collector: CollectorConfig,
    /// 로그 테일링 설정
    #[serde(default)]
    pub log_tail: LogTailConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            rcon: RconConfig::default(),
            collector: CollectorConfig::default(),
            log_tail: LogTailConfig::default(),
        }
    }

    /// 수집 간격
    pub fn collect_interval(&self) -> Duration {
        Duration::from_millis(self.collector.interval_ms)
    }

    /// 로그 테일러 재시도 대기
    pub fn tail_backoff(&self) -> Duration {
        Duration::from_millis(self.log_tail.backoff_ms)
    }

    /// 설정값 검증 (시작 시 1회)
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.collector.interval_ms == 0 {
            return Err(CoreError::Config("수집 간격은 0보다 커야 함".to_string()));
        }
        if self.rcon.host.trim().is_empty() {
            return Err(CoreError::Config("RCON 호스트가 비어 있음".to_string()));
        }
        if self.log_tail.namespace.trim().is_empty() {
            return Err(CoreError::Config("네임스페이스가 비어 있음".to_string()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// RCON 설정
// ============================================================

/// RCON 접속 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RconConfig {
    /// 서버 호스트
    pub host: String,
    /// 서버 포트
    pub port: u16,
    /// RCON 비밀번호
    #[serde(default)]
    pub password: String,
    /// 연결 타임아웃 (밀리초)
    #[serde(default = "default_dial_timeout_ms")]
    pub dial_timeout_ms: u64,
    /// 요청/응답 1회 왕복 제한 (밀리초)
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

impl RconConfig {
    /// `host:port` 주소
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27015,
            password: String::new(),
            dial_timeout_ms: default_dial_timeout_ms(),
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

fn default_dial_timeout_ms() -> u64 {
    5_000
}

fn default_io_timeout_ms() -> u64 {
    5_000
}

// ============================================================
// 수집 설정
// ============================================================

/// 메트릭 수집 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// 수집 및 메트릭 내보내기 간격 (밀리초)
    pub interval_ms: u64,
    /// 원격에서 실행할 Lua 스크립트 경로
    pub script_path: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            script_path: PathBuf::from("/lua/collect.lua"),
        }
    }
}

// ============================================================
// 로그 테일링 설정
// ============================================================

/// 기본 서비스 어카운트 토큰 경로
pub const DEFAULT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// 기본 서비스 어카운트 CA 경로
pub const DEFAULT_CA_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// 로그 테일링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogTailConfig {
    /// 대상 파드 네임스페이스
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// 파드 라벨 셀렉터
    #[serde(default = "default_pod_label")]
    pub pod_label: String,
    /// Kubernetes API 주소
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// 베어러 토큰 파일 경로
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// CA 번들 경로 (없으면 인증서 검증 생략)
    #[serde(default = "default_ca_path")]
    pub ca_path: PathBuf,
    /// 실패 후 재시도 대기 (밀리초)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// 탐색 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl LogTailConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for LogTailConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            pod_label: default_pod_label(),
            api_base: default_api_base(),
            token_path: default_token_path(),
            ca_path: default_ca_path(),
            backoff_ms: default_backoff_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_namespace() -> String {
    "factorio".to_string()
}

fn default_pod_label() -> String {
    "app=factorio-factorio-server-charts".to_string()
}

fn default_api_base() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_PATH)
}

fn default_ca_path() -> PathBuf {
    PathBuf::from(DEFAULT_CA_PATH)
}

fn default_backoff_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}
