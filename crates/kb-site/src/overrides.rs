//! Category title overrides.
//!
//! Some main pages carry a title that does not describe the category well.
//! An override table corrects those without editing upstream content.

use kb_naming::title_case;
use serde::{Deserialize, Serialize};

/// Replacement title for a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleOverride {
    /// Category id (directory name without order prefix).
    pub category: String,
    /// Title to show.
    pub title: String,
    /// Only apply when the main page title equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
}

impl TitleOverride {
    fn applies(&self, category_id: &str, main_title: Option<&str>) -> bool {
        self.category == category_id
            && self
                .replaces
                .as_deref()
                .is_none_or(|expected| main_title == Some(expected))
    }
}

/// Overrides for known upstream title mistakes.
#[must_use]
pub fn default_title_overrides() -> Vec<TitleOverride> {
    vec![TitleOverride {
        category: "networking".to_owned(),
        title: "Сетевые технологии".to_owned(),
        replaces: Some("Браузер".to_owned()),
    }]
}

/// Resolve a category title: matching override, else main page title, else
/// the title-cased id.
#[must_use]
pub fn resolve_category_title(
    overrides: &[TitleOverride],
    category_id: &str,
    main_title: Option<&str>,
) -> String {
    overrides
        .iter()
        .find(|o| o.applies(category_id, main_title))
        .map(|o| o.title.clone())
        .or_else(|| main_title.filter(|t| !t.is_empty()).map(str::to_owned))
        .unwrap_or_else(|| title_case(category_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_override_applies() {
        let title = resolve_category_title(&default_title_overrides(), "networking", Some("Браузер"));
        assert_eq!(title, "Сетевые технологии");
    }

    #[test]
    fn test_guarded_override_skips_other_titles() {
        let title = resolve_category_title(&default_title_overrides(), "networking", Some("Сеть"));
        assert_eq!(title, "Сеть");
    }

    #[test]
    fn test_guarded_override_needs_main_page() {
        let title = resolve_category_title(&default_title_overrides(), "networking", None);
        assert_eq!(title, "Networking");
    }

    #[test]
    fn test_unconditional_override() {
        let overrides = vec![TitleOverride {
            category: "html_css".to_owned(),
            title: "HTML & CSS".to_owned(),
            replaces: None,
        }];
        assert_eq!(resolve_category_title(&overrides, "html_css", None), "HTML & CSS");
        assert_eq!(resolve_category_title(&overrides, "html_css", Some("Verstka")), "HTML & CSS");
    }

    #[test]
    fn test_main_title_then_title_case() {
        assert_eq!(resolve_category_title(&[], "react", Some("React")), "React");
        assert_eq!(resolve_category_title(&[], "html_css", None), "Html Css");
    }
}
