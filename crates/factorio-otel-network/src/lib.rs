//! # factorio-otel-network
//!
//! 네트워크 어댑터.
//! 게임 서버 원격 콘솔(RCON over TCP)과 Kubernetes API(파드 탐색, 로그 스트리밍)
//! 통신을 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use factorio_otel_network::rcon::RconConnector;
//! use factorio_otel_network::kube_client::KubeClient;
//!
//! let connector = RconConnector::from_config(&config.rcon);
//! let kube = KubeClient::new(&config.log_tail)?;
//! ```

pub mod auth;
pub mod kube_client;
pub mod line_stream;
pub mod rcon;
