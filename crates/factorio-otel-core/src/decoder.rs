//! 통계 응답 디코더.
//!
//! 원격 스크립트 출력(JSON 텍스트)을 [`StatsSnapshot`]으로 변환한다.

use crate::error::DecodeError;
use crate::models::stats::StatsSnapshot;

/// 응답 텍스트를 디코딩
///
/// 앞뒤 공백을 제거한 뒤 비어 있으면 `EmptyResponse`,
/// 스키마 위반이면 앞부분이 보존된 `Parse` 에러를 반환한다.
pub fn decode_stats(raw: &str) -> Result<StatsSnapshot, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|e| DecodeError::parse(e, trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const FULL: &str = r#"{
        "tick": 100,
        "players": 2,
        "evolution": 0.05,
        "item_production": {"iron-plate": 12.5, "copper-plate": 3},
        "item_consumption": {"iron-plate": 4},
        "fluid_production": {"water": 1200.0},
        "fluid_consumption": {},
        "kill_counts": {"small-biter": 7},
        "entity_built": {"transport-belt": 40},
        "power_production": {"steam-engine": 900000.0},
        "power_consumption": {"assembling-machine-1": 75000.0},
        "rockets_launched": 1,
        "research": "automation",
        "research_progress": 0.3
    }"#;

    #[test]
    fn decodes_full_payload() {
        let s = decode_stats(FULL).unwrap();
        assert_eq!(s.tick, 100);
        assert_eq!(s.players, 2);
        assert_eq!(s.rockets_launched, 1);
        assert_eq!(s.research.as_deref(), Some("automation"));
        assert_eq!(s.item_production["iron-plate"], 12.5);
        assert_eq!(s.item_production["copper-plate"], 3.0);
        assert!(s.fluid_consumption.is_empty());
        assert_eq!(s.kill_counts["small-biter"], 7.0);
    }

    #[test]
    fn reencoding_preserves_values() {
        let first = decode_stats(FULL).unwrap();
        let json = serde_json::to_string(&first).unwrap();
        let second = decode_stats(&json).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_only_is_empty_response() {
        for raw in ["", "   ", "\n\t \r\n"] {
            assert_matches!(decode_stats(raw), Err(DecodeError::EmptyResponse));
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let s = decode_stats("\n  {\"tick\": 5}  \n").unwrap();
        assert_eq!(s.tick, 5);
    }

    #[test]
    fn missing_mappings_default_to_empty() {
        let s = decode_stats(r#"{"tick": 1, "players": 0, "evolution": 0.0}"#).unwrap();
        assert!(s.item_production.is_empty());
        assert!(s.power_consumption.is_empty());
        assert!(s.entity_built.is_empty());
        assert_eq!(s.research, None);
    }

    #[test]
    fn null_and_empty_array_mappings_are_empty() {
        let s = decode_stats(r#"{"item_production": null, "kill_counts": []}"#).unwrap();
        assert!(s.item_production.is_empty());
        assert!(s.kill_counts.is_empty());
    }

    #[test]
    fn non_empty_array_mapping_is_parse_error() {
        assert_matches!(
            decode_stats(r#"{"kill_counts": [1, 2]}"#),
            Err(DecodeError::Parse { .. })
        );
    }

    #[test]
    fn explicit_null_research_is_none() {
        let s = decode_stats(r#"{"research": null, "research_progress": 0.0}"#).unwrap();
        assert_eq!(s.research, None);
    }

    #[test]
    fn malformed_payload_keeps_prefix() {
        let raw = format!("Cannot execute command. Error: {}", "y".repeat(400));
        match decode_stats(&raw) {
            Err(DecodeError::Parse { payload, .. }) => {
                assert!(payload.starts_with("Cannot execute command."));
                assert_eq!(payload.chars().count(), 200);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn wrong_scalar_type_is_parse_error() {
        assert_matches!(
            decode_stats(r#"{"tick": "soon"}"#),
            Err(DecodeError::Parse { .. })
        );
    }
}
