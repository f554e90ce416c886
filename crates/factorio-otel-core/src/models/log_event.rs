//! 로그 이벤트 모델.
//!
//! 게임 서버 로그 한 줄을 분류한 결과. 매칭된 줄마다 하나씩 생성되어 즉시 내보내진다.

use serde::{Deserialize, Serialize};

/// 분류된 로그 이벤트 (닫힌 집합)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    /// 채팅 메시지
    Chat { player: String, message: String },
    /// 플레이어 접속
    Join { player: String },
    /// 플레이어 퇴장
    Leave { player: String },
    /// 연구 완료
    Research { tech: String },
    /// 로켓 발사
    Rocket,
    /// 게임 저장
    Save { name: String },
}

impl LogEvent {
    /// 이벤트 종류 문자열 (텔레메트리 레코드 본문)
    pub fn kind(&self) -> &'static str {
        match self {
            LogEvent::Chat { .. } => "chat",
            LogEvent::Join { .. } => "join",
            LogEvent::Leave { .. } => "leave",
            LogEvent::Research { .. } => "research",
            LogEvent::Rocket => "rocket",
            LogEvent::Save { .. } => "save",
        }
    }

    /// 종류별 속성 (key, value)
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            LogEvent::Chat { player, message } => {
                vec![("player", player.as_str()), ("message", message.as_str())]
            }
            LogEvent::Join { player } | LogEvent::Leave { player } => {
                vec![("player", player.as_str())]
            }
            LogEvent::Research { tech } => vec![("tech", tech.as_str())],
            LogEvent::Rocket => Vec::new(),
            LogEvent::Save { name } => vec![("name", name.as_str())],
        }
    }
}
