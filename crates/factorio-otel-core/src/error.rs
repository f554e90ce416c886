//! factorio-otel 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 실패를 `CoreError`로 매핑해 반환한다.
//! 정상 운영 중 발생하는 에러는 전부 해당 컴포넌트 안에서 로그로만 처리된다.

use thiserror::Error;

/// 파싱 실패 시 진단용으로 보존하는 응답 앞부분 길이 (문자 수)
pub const PAYLOAD_PREVIEW_CHARS: usize = 200;

/// 통계 응답 디코딩 에러.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 공백 제거 후 응답이 비어 있음
    #[error("빈 응답")]
    EmptyResponse,

    /// JSON 스키마 위반
    #[error("JSON 파싱 실패: {source} (응답: {payload})")]
    Parse {
        /// serde_json 원인 에러
        #[source]
        source: serde_json::Error,
        /// 잘린 원본 응답 (최대 [`PAYLOAD_PREVIEW_CHARS`]자)
        payload: String,
    },
}

impl DecodeError {
    /// 원본 응답을 앞부분만 남겨 `Parse` 에러 생성
    pub fn parse(source: serde_json::Error, payload: &str) -> Self {
        Self::Parse {
            source,
            payload: payload.chars().take(PAYLOAD_PREVIEW_CHARS).collect(),
        }
    }
}

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// API 응답 JSON 역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 통계 응답 디코딩 실패
    #[error("디코딩 에러: {0}")]
    Decode(#[from] DecodeError),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 실패 (RCON 비밀번호 거부, 토큰 읽기 실패 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Pod")
        resource_type: String,
        /// 리소스 식별자 또는 셀렉터
        id: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃, 비정상 HTTP 상태)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 와이어 프로토콜 위반 (잘못된 패킷, 크기 초과)
    #[error("프로토콜 에러: {0}")]
    Protocol(String),

    /// 로그 스트림이 원격에서 정상 종료됨 (대상 재시작 등)
    #[error("스트림 종료: {0}")]
    StreamEnded(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
