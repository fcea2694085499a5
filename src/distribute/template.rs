use itertools::Itertools;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::distribute::error::TemplateError;

/// Marker for the numeric sequence index in a naming template.
pub const PLACEHOLDER: &str = "{n}";

/// Built-in default naming template.
pub const DEFAULT_TEMPLATE: &str = "图片 {n}";

/// Digit run that replaces the placeholder.
const INDEX_PATTERN: &str = "([0-9]+)";

/// Compiled naming template.
///
/// Matches a whole file stem against the template,
/// with every literal character of the template matching itself
/// and the placeholder matching one or more decimal digits.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    template: String,
    regex: Regex,
    placeholders: usize,
}

impl TemplateMatcher {
    /// Compile a template without checking the placeholder count.
    ///
    /// A template without the placeholder has no capture group,
    /// so it never yields an index and every extraction fails.
    /// With several placeholders, each one matches digits and the first one is the index.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let template: String = template.nfc().collect();
        let placeholders = template.matches(PLACEHOLDER).count();
        let pattern = template.split(PLACEHOLDER).map(regex::escape).join(INDEX_PATTERN);
        let regex = Regex::new(&format!("^{pattern}$")).map_err(|error| TemplateError::Pattern {
            template: template.clone(),
            message: error.to_string(),
        })?;
        Ok(Self {
            template,
            regex,
            placeholders,
        })
    }

    /// The template this matcher was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of placeholder occurrences in the template.
    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// Returns true if the file stem matches the template and has an index.
    #[must_use]
    pub fn is_match(&self, stem: &str) -> bool {
        self.extract_index(stem).is_some()
    }

    /// Extract the sequence index from a file stem.
    ///
    /// ```rust
    /// use card_sort::distribute::TemplateMatcher;
    ///
    /// let matcher = TemplateMatcher::new("IMG_{n}").unwrap();
    /// assert_eq!(matcher.extract_index("IMG_0042"), Some(42));
    /// assert_eq!(matcher.extract_index("IMG_42_copy"), None);
    /// ```
    #[must_use]
    pub fn extract_index(&self, stem: &str) -> Option<u64> {
        let stem: String = stem.nfc().collect();
        let captures = self.regex.captures(&stem)?;
        captures.get(1)?.as_str().parse::<u64>().ok()
    }

    /// Build the file stem for the given index.
    #[must_use]
    pub fn render(&self, index: u64) -> String {
        self.template.replace(PLACEHOLDER, &index.to_string())
    }
}

/// Compile a naming template that must contain the placeholder exactly once.
pub fn compile_template(template: &str) -> Result<TemplateMatcher, TemplateError> {
    validate_template(template)?;
    TemplateMatcher::new(template.trim())
}

/// Check that a template is non-empty and contains the placeholder exactly once.
pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    let template = template.trim();
    if template.is_empty() {
        return Err(TemplateError::Empty);
    }
    match template.matches(PLACEHOLDER).count() {
        0 => Err(TemplateError::MissingPlaceholder(template.to_string())),
        1 => Ok(()),
        _ => Err(TemplateError::MultiplePlaceholders(template.to_string())),
    }
}

/// Pick the template to use for a run.
///
/// An explicit selection from the template list wins,
/// then free-text input if it contains the placeholder,
/// and finally the persisted default.
#[must_use]
pub fn resolve_template(selection: Option<&str>, free_text: Option<&str>, default: &str) -> String {
    if let Some(selected) = selection.map(str::trim).filter(|s| !s.is_empty()) {
        return selected.to_string();
    }
    if let Some(text) = free_text.map(str::trim).filter(|s| s.contains(PLACEHOLDER)) {
        return text.to_string();
    }
    default.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_default_templates() {
        let cases = [
            ("图片 {n}", "图片 1", 1),
            ("图片-{n}", "图片-27", 27),
            ("IMG_{n}", "IMG_0007", 7),
            ("{n}号照片", "12号照片", 12),
            ("photo_{n}", "photo_100", 100),
            ("image_{n}", "image_0", 0),
        ];
        for (template, stem, index) in cases {
            let matcher = compile_template(template).unwrap();
            assert_eq!(matcher.extract_index(stem), Some(index), "{template} vs {stem}");
        }
    }

    #[test]
    fn rendered_names_round_trip() {
        for template in ["IMG_{n}", "scan ({n})", "a.b*c+{n}[x]", "{n}", "$^{n}?"] {
            let matcher = compile_template(template).unwrap();
            for index in [0, 1, 9, 10, 123_456, u64::from(u32::MAX)] {
                let stem = matcher.render(index);
                assert_eq!(matcher.extract_index(&stem), Some(index), "{template} with {index}");
            }
        }
    }

    #[test]
    fn literal_characters_are_escaped() {
        let matcher = compile_template("a.b_{n}").unwrap();
        assert!(matcher.is_match("a.b_1"));
        assert!(!matcher.is_match("axb_1"));

        let matcher = compile_template("(x)+{n}").unwrap();
        assert!(matcher.is_match("(x)+5"));
        assert!(!matcher.is_match("xx5"));
    }

    #[test]
    fn requires_full_match() {
        let matcher = compile_template("IMG_{n}").unwrap();
        assert!(!matcher.is_match("IMG_12_edit"));
        assert!(!matcher.is_match("old_IMG_12"));
        assert!(!matcher.is_match("IMG_"));
        assert!(!matcher.is_match("IMG_1a"));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        let matcher = compile_template("IMG_{n}").unwrap();
        assert!(!matcher.is_match("IMG_١٢"));
        assert!(!matcher.is_match("IMG_１２"));
    }

    #[test]
    fn overflowing_index_is_not_a_match() {
        let matcher = compile_template("IMG_{n}").unwrap();
        assert_eq!(matcher.extract_index("IMG_99999999999999999999999"), None);
    }

    #[test]
    fn template_without_placeholder_never_matches() {
        let matcher = TemplateMatcher::new("IMG").unwrap();
        assert_eq!(matcher.placeholder_count(), 0);
        assert!(!matcher.is_match("IMG"));
        assert!(!matcher.is_match("IMG1"));
    }

    #[test]
    fn lenient_matcher_uses_first_placeholder() {
        let matcher = TemplateMatcher::new("{n}-{n}").unwrap();
        assert_eq!(matcher.placeholder_count(), 2);
        assert_eq!(matcher.extract_index("3-4"), Some(3));
    }

    #[test]
    fn decomposed_stem_matches_composed_template() {
        let matcher = compile_template("Å_{n}").unwrap();
        assert_eq!(matcher.extract_index("A\u{30a}_5"), Some(5));
    }

    #[test]
    fn strict_compile_rejects_bad_placeholder_counts() {
        assert_eq!(compile_template("   ").unwrap_err(), TemplateError::Empty);
        assert_eq!(
            compile_template("IMG").unwrap_err(),
            TemplateError::MissingPlaceholder("IMG".to_string())
        );
        assert_eq!(
            compile_template("{n}_{n}").unwrap_err(),
            TemplateError::MultiplePlaceholders("{n}_{n}".to_string())
        );
    }

    #[test]
    fn resolve_prefers_selection() {
        let resolved = resolve_template(Some("IMG_{n}"), Some("photo_{n}"), DEFAULT_TEMPLATE);
        assert_eq!(resolved, "IMG_{n}");
    }

    #[test]
    fn resolve_uses_free_text_without_selection() {
        let resolved = resolve_template(None, Some(" photo_{n} "), DEFAULT_TEMPLATE);
        assert_eq!(resolved, "photo_{n}");

        let resolved = resolve_template(Some("  "), Some("photo_{n}"), DEFAULT_TEMPLATE);
        assert_eq!(resolved, "photo_{n}");
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(resolve_template(None, None, DEFAULT_TEMPLATE), DEFAULT_TEMPLATE);
        assert_eq!(resolve_template(None, Some("photo"), "IMG_{n}"), "IMG_{n}");
        assert_eq!(resolve_template(None, Some(""), "IMG_{n}"), "IMG_{n}");
    }
}
