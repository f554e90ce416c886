//! 통계 스냅샷 모델.
//!
//! 원격 스크립트가 한 번의 수집 주기에 반환하는 JSON 페이로드를 정의한다.
//! 매핑 필드의 키(아이템/엔티티 이름)는 런타임에 발견되며 스키마에 고정되지 않는다.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 이름 → 측정값 매핑 (삽입 순서 무관)
pub type NamedValues = HashMap<String, f64>;

/// 한 수집 주기의 디코딩된 측정 묶음.
///
/// 디코딩 후 변경하지 않으며, 측정값 기록이 끝나면 버린다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// 게임 틱 (단조 증가)
    #[serde(default)]
    pub tick: i64,
    /// 접속 중인 플레이어 수
    #[serde(default)]
    pub players: i64,
    /// 적 진화 계수 (0..1)
    #[serde(default)]
    pub evolution: f64,
    /// 아이템 생산량
    #[serde(default, deserialize_with = "lenient_map")]
    pub item_production: NamedValues,
    /// 아이템 소비량
    #[serde(default, deserialize_with = "lenient_map")]
    pub item_consumption: NamedValues,
    /// 유체 생산량
    #[serde(default, deserialize_with = "lenient_map")]
    pub fluid_production: NamedValues,
    /// 유체 소비량
    #[serde(default, deserialize_with = "lenient_map")]
    pub fluid_consumption: NamedValues,
    /// 처치 수
    #[serde(default, deserialize_with = "lenient_map")]
    pub kill_counts: NamedValues,
    /// 건설된 엔티티 수
    #[serde(default, deserialize_with = "lenient_map")]
    pub entity_built: NamedValues,
    /// 전력 생산량
    #[serde(default, deserialize_with = "lenient_map")]
    pub power_production: NamedValues,
    /// 전력 소비량
    #[serde(default, deserialize_with = "lenient_map")]
    pub power_consumption: NamedValues,
    /// 발사된 로켓 수
    #[serde(default)]
    pub rockets_launched: i64,
    /// 진행 중인 연구 이름 (명시적 null과 필드 누락 모두 `None`)
    #[serde(default)]
    pub research: Option<String>,
    /// 현재 연구 진행률 (0..1)
    #[serde(default)]
    pub research_progress: f64,
}

/// 매핑 필드 역직렬화.
///
/// 객체 외에 `null`과 빈 배열도 빈 매핑으로 받아들인다.
/// 게임의 JSON 인코더는 빈 Lua 테이블을 `[]`로 내보낸다.
fn lenient_map<'de, D>(deserializer: D) -> Result<NamedValues, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientMapVisitor;

    impl<'de> Visitor<'de> for LenientMapVisitor {
        type Value = NamedValues;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("이름→숫자 객체, null 또는 빈 배열")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(NamedValues::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(NamedValues::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            if seq.next_element::<de::IgnoredAny>()?.is_some() {
                return Err(de::Error::invalid_length(1, &"빈 배열"));
            }
            Ok(NamedValues::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut values = NamedValues::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, value)) = map.next_entry::<String, f64>()? {
                values.insert(name, value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_any(LenientMapVisitor)
}
