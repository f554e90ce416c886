//! # factorio-otel-core
//!
//! factorio-otel 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 통계 스냅샷, 로그 이벤트, 계측기 정의
//! - [`decoder`]: 원격 스크립트 응답 → [`models::stats::StatsSnapshot`]
//! - [`classifier`]: 로그 라인 → [`models::log_event::LogEvent`]
//! - [`attributes`]: 동적 이름 태그 속성
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체

pub mod attributes;
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod error;
pub mod models;
pub mod ports;
