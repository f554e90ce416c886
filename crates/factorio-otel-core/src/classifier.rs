//! 로그 라인 분류기.
//!
//! 고정 우선순위의 패턴 목록을 차례로 적용해 첫 번째로 매칭된 패턴의 이벤트를 반환한다.
//! 채팅 메시지 안에 "joined the game" 같은 문구가 들어갈 수 있으므로 순서를 바꾸면 안 된다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::log_event::LogEvent;

static CHAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[CHAT\]\s+(.+?):\s+(.+)").expect("chat pattern"));
static JOIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?)\s+joined the game").expect("join pattern"));
static LEAVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?)\s+left the game").expect("leave pattern"));
static RESEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Research finished:\s+(.+)").expect("research pattern"));
static SAVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Saving game as\s+(.+)").expect("save pattern"));

const ROCKET: &str = "Rocket launched";

/// 로그 한 줄을 분류
///
/// 대부분의 줄은 어떤 패턴에도 맞지 않으며 `None`이 정상 결과다.
pub fn classify(line: &str) -> Option<LogEvent> {
    if let Some(c) = CHAT.captures(line) {
        return Some(LogEvent::Chat {
            player: c[1].to_string(),
            message: c[2].to_string(),
        });
    }
    if let Some(c) = JOIN.captures(line) {
        return Some(LogEvent::Join {
            player: c[1].to_string(),
        });
    }
    if let Some(c) = LEAVE.captures(line) {
        return Some(LogEvent::Leave {
            player: c[1].to_string(),
        });
    }
    if let Some(c) = RESEARCH.captures(line) {
        return Some(LogEvent::Research {
            tech: c[1].to_string(),
        });
    }
    if line.contains(ROCKET) {
        return Some(LogEvent::Rocket);
    }
    if let Some(c) = SAVE.captures(line) {
        return Some(LogEvent::Save {
            name: c[1].to_string(),
        });
    }
    None
}
