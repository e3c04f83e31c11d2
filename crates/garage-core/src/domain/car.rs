//! 차량 매물 도메인 규칙.
//!
//! 태그 파싱과 이미지 개수 제한 등 매물에 적용되는 불변 규칙을 정의합니다.

/// 매물당 최대 이미지 개수.
pub const MAX_CAR_IMAGES: usize = 10;

/// 매물 생성 시 이미지 개수 초과 에러 메시지.
pub const TOO_MANY_IMAGES_ON_CREATE: &str = "Cannot upload more than 10 images";

/// 매물 수정 시 이미지 개수 초과 에러 메시지.
pub const TOO_MANY_IMAGES_ON_UPDATE: &str = "Cannot have more than 10 images";

/// 쉼표로 구분된 태그 문자열을 태그 목록으로 파싱합니다.
///
/// 각 태그는 앞뒤 공백이 제거되며 입력 순서가 보존됩니다.
/// 공백뿐인 태그는 제거됩니다. 입력이 없거나 비어 있으면 빈 목록을 반환합니다.
///
/// # Example
///
/// ```
/// use garage_core::domain::parse_tags;
///
/// assert_eq!(parse_tags(Some(" suv , hybrid ,2024 ")), vec!["suv", "hybrid", "2024"]);
/// assert!(parse_tags(None).is_empty());
/// ```
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => s
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// 이미지 개수가 제한을 초과하는지 확인합니다.
pub fn exceeds_image_limit(count: usize) -> bool {
    count > MAX_CAR_IMAGES
}

/// SQL LIKE/ILIKE 패턴 메타문자를 이스케이프합니다.
///
/// 검색어를 unanchored 부분 문자열 패턴(`%...%`)으로 사용하기 전에
/// `%`, `_`, 이스케이프 문자 `\` 자체를 리터럴로 처리합니다.
pub fn escape_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_tags_basic() {
        assert_eq!(
            parse_tags(Some("sedan,red,2019")),
            vec!["sedan", "red", "2019"]
        );
    }

    #[test]
    fn test_parse_tags_trims_whitespace() {
        assert_eq!(
            parse_tags(Some("  sedan ,  red  , 2019")),
            vec!["sedan", "red", "2019"]
        );
    }

    #[test]
    fn test_parse_tags_preserves_order() {
        assert_eq!(parse_tags(Some("c,b,a")), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some("")).is_empty());
        assert!(parse_tags(Some("   ")).is_empty());
    }

    #[test]
    fn test_parse_tags_drops_blank_entries() {
        assert_eq!(parse_tags(Some("a,,b, ,c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_image_limit() {
        assert!(!exceeds_image_limit(0));
        assert!(!exceeds_image_limit(MAX_CAR_IMAGES));
        assert!(exceeds_image_limit(MAX_CAR_IMAGES + 1));
    }

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("civ"), "civ");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }

    proptest! {
        #[test]
        fn prop_parse_tags_never_contains_blank(input in ".{0,64}") {
            for tag in parse_tags(Some(&input)) {
                prop_assert!(!tag.is_empty());
                prop_assert_eq!(tag.trim(), tag.as_str());
            }
        }

        #[test]
        fn prop_escape_leaves_no_bare_metacharacters(input in ".{0,64}") {
            let escaped = escape_like_pattern(&input);
            let mut chars = escaped.chars();
            while let Some(ch) = chars.next() {
                if ch == '\\' {
                    // 이스케이프 문자 다음은 항상 메타문자
                    let next = chars.next();
                    prop_assert!(matches!(next, Some('%' | '_' | '\\')));
                } else {
                    prop_assert!(!matches!(ch, '%' | '_'));
                }
            }
        }
    }
}
