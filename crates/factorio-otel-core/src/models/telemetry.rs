//! 텔레메트리 모델.
//!
//! 고정된 게이지 계측기 목록과 기록 값 타입을 정의한다.
//! 계측기 이름은 백엔드 대시보드와 맞물려 있으므로 바꾸지 않는다.

use std::fmt;

/// 게이지 계측기 (13개 고정)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gauge {
    Players,
    Evolution,
    Tick,
    RocketsLaunched,
    ResearchProgress,
    ItemProduction,
    ItemConsumption,
    FluidProduction,
    FluidConsumption,
    PowerProduction,
    PowerConsumption,
    KillCount,
    EntityBuilt,
}

impl Gauge {
    /// 전체 계측기 목록
    pub const ALL: [Gauge; 13] = [
        Gauge::Players,
        Gauge::Evolution,
        Gauge::Tick,
        Gauge::RocketsLaunched,
        Gauge::ResearchProgress,
        Gauge::ItemProduction,
        Gauge::ItemConsumption,
        Gauge::FluidProduction,
        Gauge::FluidConsumption,
        Gauge::PowerProduction,
        Gauge::PowerConsumption,
        Gauge::KillCount,
        Gauge::EntityBuilt,
    ];

    /// 내보내기 시 사용하는 계측기 이름
    pub fn name(self) -> &'static str {
        match self {
            Gauge::Players => "factorio_players",
            Gauge::Evolution => "factorio_evolution",
            Gauge::Tick => "factorio_tick",
            Gauge::RocketsLaunched => "factorio_rockets_launched",
            Gauge::ResearchProgress => "factorio_research_progress",
            Gauge::ItemProduction => "factorio_item_production",
            Gauge::ItemConsumption => "factorio_item_consumption",
            Gauge::FluidProduction => "factorio_fluid_production",
            Gauge::FluidConsumption => "factorio_fluid_consumption",
            Gauge::PowerProduction => "factorio_power_production",
            Gauge::PowerConsumption => "factorio_power_consumption",
            Gauge::KillCount => "factorio_kill_count",
            Gauge::EntityBuilt => "factorio_entity_built",
        }
    }

    /// 정수 게이지 여부 (나머지는 실수)
    pub fn is_integer(self) -> bool {
        matches!(self, Gauge::Players | Gauge::Tick | Gauge::RocketsLaunched)
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 게이지에 기록할 값
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeValue {
    Int(i64),
    Float(f64),
}

impl GaugeValue {
    /// 실수로 변환 (정수 게이지에 실수가 들어오는 경우 등)
    pub fn as_f64(self) -> f64 {
        match self {
            GaugeValue::Int(v) => v as f64,
            GaugeValue::Float(v) => v,
        }
    }

    /// 정수로 변환 (소수점 이하 절삭)
    pub fn as_i64(self) -> i64 {
        match self {
            GaugeValue::Int(v) => v,
            GaugeValue::Float(v) => v as i64,
        }
    }
}

impl From<i64> for GaugeValue {
    fn from(v: i64) -> Self {
        GaugeValue::Int(v)
    }
}

impl From<f64> for GaugeValue {
    fn from(v: f64) -> Self {
        GaugeValue::Float(v)
    }
}
