//! TF-IDF unigram extraction for concept labels (`spec.md` §4.C), grounded on
//! `cortex-consolidation::algorithms::tfidf::extract_key_phrases`.

use std::collections::HashMap;

pub fn extract_key_terms(documents: &[String], limit: usize) -> Vec<(String, f64)> {
    if documents.is_empty() {
        return Vec::new();
    }

    let n_docs = documents.len() as f64;
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

    let mut df: HashMap<String, usize> = HashMap::new();
    for tokens in &tokenized {
        let unique: std::collections::HashSet<&String> = tokens.iter().collect();
        for term in unique {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let mut tf: HashMap<String, usize> = HashMap::new();
    let mut total_terms = 0usize;
    // Track first appearance order so tied scores break deterministically.
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut position = 0usize;
    for tokens in &tokenized {
        for token in tokens {
            *tf.entry(token.clone()).or_insert(0) += 1;
            first_seen.entry(token.clone()).or_insert(position);
            position += 1;
            total_terms += 1;
        }
    }

    if total_terms == 0 {
        return Vec::new();
    }

    let mut scores: Vec<(String, f64)> = tf
        .iter()
        .filter_map(|(term, &count)| {
            let doc_freq = *df.get(term)? as f64;
            let term_freq = count as f64 / total_terms as f64;
            let idf = (n_docs / doc_freq).ln() + 1.0;
            Some((term.clone(), term_freq * idf))
        })
        .collect();

    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0]))
    });
    scores.truncate(limit);
    scores
}

/// Derive a concept label: the top-scoring TF-IDF unigram across member
/// thought contents, ties broken by first appearance (Open Question,
/// `SPEC_FULL.md` §9).
pub fn derive_label(documents: &[String]) -> String {
    extract_key_terms(documents, 1)
        .into_iter()
        .next()
        .map(|(term, _)| term)
        .unwrap_or_else(|| "concept".to_string())
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| w.len() > 2 && !is_stop_word(w))
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "for" | "are" | "but" | "not" | "you" | "all" | "can" | "had" | "her"
            | "was" | "one" | "our" | "out" | "has" | "have" | "been" | "from" | "this" | "that"
            | "with" | "would" | "there" | "their" | "what" | "about" | "which" | "when"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_label_picks_most_distinctive_term() {
        let docs = vec![
            "recurring dream about flying over mountains".to_string(),
            "another dream where i was flying".to_string(),
            "flying dreams happen often lately".to_string(),
        ];
        let label = derive_label(&docs);
        assert_eq!(label, "flying");
    }

    #[test]
    fn empty_documents_falls_back_to_default_label() {
        assert_eq!(derive_label(&[]), "concept");
    }
}
