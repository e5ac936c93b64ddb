use crate::models::ColorKeyword;

/// Picks the color for a class name from the keyword table. Keywords are
/// expected in priority order (highest first, as the repository returns
/// them); the first case-insensitive substring match wins.
pub fn resolve_keyword_color<'a>(class_name: &str, keywords: &'a [ColorKeyword]) -> Option<&'a str> {
    let name_lower = class_name.to_lowercase();
    keywords
        .iter()
        .find(|kw| name_lower.contains(&kw.keyword.to_lowercase()))
        .map(|kw| kw.color.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(id: i64, keyword: &str, color: &str, priority: i64) -> ColorKeyword {
        ColorKeyword {
            id,
            keyword: keyword.to_string(),
            color: color.to_string(),
            priority,
        }
    }

    #[test]
    fn matches_are_case_insensitive_substrings() {
        let keywords = [keyword(1, "salsa", "#E74C3C", 10)];
        assert_eq!(
            resolve_keyword_color("Salsa Beginners II", &keywords),
            Some("#E74C3C")
        );
        assert_eq!(resolve_keyword_color("Bachata", &keywords), None);
    }

    #[test]
    fn first_keyword_in_priority_order_wins() {
        let keywords = [
            keyword(1, "advanced", "#111111", 20),
            keyword(2, "salsa", "#222222", 10),
        ];
        assert_eq!(
            resolve_keyword_color("Salsa Advanced", &keywords),
            Some("#111111")
        );
    }
}
