//! 측정값 태그 속성.
//!
//! 동적 이름(아이템/엔티티)은 계측기를 새로 만들지 않고 속성 값으로 붙인다.
//! 모든 매핑 키는 [`name_attribute`]를 거쳐 태그된다.

/// 동적 이름 태그의 속성 키
pub const NAME_KEY: &str = "name";

/// 측정값에 붙는 key-value 속성
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub key: &'static str,
    pub value: String,
}

/// `name=<name>` 속성 생성
pub fn name_attribute(name: &str) -> Attribute {
    Attribute {
        key: NAME_KEY,
        value: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_name_attribute() {
        let attr = name_attribute("iron-plate");
        assert_eq!(attr.key, "name");
        assert_eq!(attr.value, "iron-plate");
    }

    #[test]
    fn keeps_arbitrary_names_verbatim() {
        let attr = name_attribute("  weird name: with=symbols ");
        assert_eq!(attr.value, "  weird name: with=symbols ");
        assert_eq!(name_attribute("").value, "");
    }
}
