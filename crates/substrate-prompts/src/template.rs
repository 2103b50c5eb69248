//! Template rendering (`spec.md` §4.D): substitute `{{name}}` placeholders
//! in a pattern's template with caller-supplied variables, grounded on the
//! `{{variable}}`-style regex substitution used throughout `Agent-Zoey-Zoey`'s
//! workflow/adaptor layer (`zoey-ext-workflow::engine`,
//! `zoey-adaptor-terminal`, `zoey-adaptor-web`).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use substrate_core::errors::PatternError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Render `template` by substituting every `{{name}}` with
/// `variables["name"]`. Any placeholder with no matching variable raises a
/// *pattern/context mismatch* error (`spec.md` §4.D, §7).
pub fn render(template: &str, variables: &HashMap<String, String>) -> Result<String, PatternError> {
    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        let name = &caps[1];
        match variables.get(name) {
            Some(value) => value.clone(),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });

    match missing {
        Some(placeholder) => Err(PatternError::PlaceholderMismatch {
            template: template.to_string(),
            placeholder,
        }),
        None => Ok(rendered.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_every_named_placeholder() {
        let mut vars = HashMap::new();
        vars.insert("value".to_string(), "the ocean".to_string());
        let rendered = render("What does {{value}} reveal?", &vars).unwrap();
        assert_eq!(rendered, "What does the ocean reveal?");
    }

    #[test]
    fn missing_variable_raises_placeholder_mismatch() {
        let vars = HashMap::new();
        let err = render("Describe {{value}}.", &vars).unwrap_err();
        assert!(matches!(err, PatternError::PlaceholderMismatch { placeholder, .. } if placeholder == "value"));
    }

    #[test]
    fn template_without_placeholders_passes_through_unchanged() {
        let vars = HashMap::new();
        let rendered = render("a plain sentence", &vars).unwrap();
        assert_eq!(rendered, "a plain sentence");
    }
}
