//! Placeholder-abstraction extraction (`spec.md` §4.D): given one thought
//! and the context variables that produced it, detect whether the thought's
//! content is stable under placeholder abstraction by replacing substrings
//! matching a context variable's *value* with that variable's placeholder
//! *name*, and recover a reusable `{{name}}` template.

use std::collections::HashMap;

/// Abstract `content` against `context` (variable name -> value). Replaces
/// every occurrence of a context value with its `{{name}}` placeholder,
/// longest values first so a shorter value can't shadow part of a longer
/// one. Returns `None` if no context value actually occurs in `content` —
/// there is nothing to templatize.
pub fn abstract_template(content: &str, context: &HashMap<String, String>) -> Option<String> {
    let mut entries: Vec<(&String, &String)> = context.iter().filter(|(_, value)| !value.is_empty()).collect();
    entries.sort_by_key(|(_, value)| std::cmp::Reverse(value.len()));

    let mut abstracted = content.to_string();
    let mut replaced_any = false;
    for (name, value) in entries {
        if abstracted.contains(value.as_str()) {
            abstracted = abstracted.replace(value.as_str(), &format!("{{{{{name}}}}}"));
            replaced_any = true;
        }
    }

    if replaced_any {
        Some(abstracted)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_context_value_with_its_placeholder_name() {
        let mut context = HashMap::new();
        context.insert("value".to_string(), "the ocean".to_string());
        let template = abstract_template("thinking about the ocean tonight", &context).unwrap();
        assert_eq!(template, "thinking about {{value}} tonight");
    }

    #[test]
    fn content_with_no_matching_context_value_yields_no_template() {
        let mut context = HashMap::new();
        context.insert("value".to_string(), "the desert".to_string());
        assert!(abstract_template("thinking about the ocean tonight", &context).is_none());
    }

    #[test]
    fn longer_values_are_substituted_before_shorter_ones_they_contain() {
        let mut context = HashMap::new();
        context.insert("topic".to_string(), "the ocean tide".to_string());
        context.insert("sub".to_string(), "tide".to_string());
        let template = abstract_template("watching the ocean tide roll in", &context).unwrap();
        assert_eq!(template, "watching {{topic}} roll in");
    }
}
