//! Built-in seed prompt patterns, one per core thought type. Seeds are
//! immutable and are never retired (`spec.md` §4.D) — they guarantee
//! `select` always has something to return even before any pattern has
//! evolved.

use chrono::{DateTime, Utc};
use substrate_core::PromptPattern;

pub fn seed_patterns(now: DateTime<Utc>) -> Vec<PromptPattern> {
    vec![
        PromptPattern::seed("reflection", "What does {{value}} reveal about my recent experience?", now),
        PromptPattern::seed("dream", "Describe a dream shaped by {{value}}.", now),
        PromptPattern::seed("monologue", "Think through {{value}} out loud, without an audience.", now),
        PromptPattern::seed("existential", "Why does {{value}} matter, if it matters at all?", now),
        PromptPattern::seed("pulse", "Note the current state of {{value}} in one line.", now),
        PromptPattern::seed("user", "Respond helpfully to: {{value}}", now),
        PromptPattern::seed("dialogue", "Continue the conversation about {{value}}.", now),
    ]
}
