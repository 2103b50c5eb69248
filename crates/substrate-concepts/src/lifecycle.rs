//! Concept stage transitions (`spec.md` §3, §4.C), table-driven the way
//! `cortex-reclassification::rules` tables importance-level transitions by
//! score threshold and cooldown — here by membership size and cycle count
//! instead.

use substrate_core::config::ConceptConfig;
use substrate_core::types::ConceptStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Promote(ConceptStage),
    Fade,
    Delete,
}

/// Decide the next lifecycle transition for one evolution cycle.
///
/// `member_count` — members after this cycle's reconciliation.
/// `cycles_alive` — cycles the concept has existed for.
/// `below_min_cycles` — consecutive cycles spent under `min_cluster_size`.
/// `is_top_decile_salience` — whether this concept's salience is in the top
/// 10% of the current concept population (`spec.md` §4.C), computed by the
/// caller since that ranking needs the whole population, not one concept.
pub fn next_transition(
    stage: ConceptStage,
    member_count: usize,
    cycles_alive: u32,
    below_min_cycles: u32,
    is_top_decile_salience: bool,
    config: &ConceptConfig,
) -> Transition {
    if below_min_cycles >= config.fading_cycles {
        return if stage == ConceptStage::Fading {
            Transition::Delete
        } else {
            Transition::Fade
        };
    }

    match stage {
        ConceptStage::Emerging => {
            if cycles_alive >= config.min_cycles_for_established && member_count >= config.min_cluster_size {
                Transition::Promote(ConceptStage::Established)
            } else {
                Transition::None
            }
        }
        ConceptStage::Established => {
            if is_top_decile_salience {
                Transition::Promote(ConceptStage::Central)
            } else {
                Transition::None
            }
        }
        ConceptStage::Central => Transition::None,
        ConceptStage::Fading => {
            if member_count >= config.min_cluster_size {
                // Recovered membership: promote back to established.
                Transition::Promote(ConceptStage::Established)
            } else {
                Transition::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConceptConfig {
        ConceptConfig::default()
    }

    #[test]
    fn emerging_promotes_after_min_cycles_with_enough_members() {
        let t = next_transition(ConceptStage::Emerging, 5, 2, 0, false, &config());
        assert_eq!(t, Transition::Promote(ConceptStage::Established));
    }

    #[test]
    fn emerging_stays_put_before_min_cycles() {
        let t = next_transition(ConceptStage::Emerging, 5, 1, 0, false, &config());
        assert_eq!(t, Transition::None);
    }

    #[test]
    fn sustained_low_membership_fades_then_deletes() {
        let config = config();
        let t = next_transition(ConceptStage::Established, 1, 5, config.fading_cycles, false, &config);
        assert_eq!(t, Transition::Fade);
        let t2 = next_transition(ConceptStage::Fading, 1, 5, config.fading_cycles, false, &config);
        assert_eq!(t2, Transition::Delete);
    }

    #[test]
    fn established_promotes_to_central_when_salience_is_top_decile() {
        let t = next_transition(ConceptStage::Established, 5, 4, 0, true, &config());
        assert_eq!(t, Transition::Promote(ConceptStage::Central));
    }

    #[test]
    fn established_stays_put_when_salience_is_not_top_decile() {
        let t = next_transition(ConceptStage::Established, 5, 4, 0, false, &config());
        assert_eq!(t, Transition::None);
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Invariant 3 (`spec.md` §8): emerging/fading concepts never promote
        // into established while under the minimum cluster size.
        #[test]
        fn never_promotes_to_established_below_min_cluster_size(
            member_count in 0usize..3,
            cycles_alive in 0u32..20,
            stage in prop_oneof![Just(ConceptStage::Emerging), Just(ConceptStage::Fading)],
        ) {
            let config = ConceptConfig::default();
            prop_assume!(member_count < config.min_cluster_size);
            let t = next_transition(stage, member_count, cycles_alive, 0, false, &config);
            prop_assert_ne!(t, Transition::Promote(ConceptStage::Established));
        }
    }
}
