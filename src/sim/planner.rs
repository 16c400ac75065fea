//! Section planner
//!
//! Terrain comes in sections: runs of consecutive lanes sharing one kind.
//! The planner picks the kind of the next section by weighted random choice,
//! discouraging kinds used in the last couple of sections, then rolls the
//! section length from the kind's range.

use std::collections::VecDeque;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;

use super::lane::LaneKind;
use crate::tuning::Tuning;

/// Effective selection weight per kind (same order as `LaneKind::ALL`).
/// The repeat penalty only kicks in once a full `repeat_window` of history exists.
pub fn section_weights(recent: &[LaneKind], tuning: &Tuning) -> [f32; 5] {
    let recent: &[LaneKind] = if recent.len() >= tuning.repeat_window {
        &recent[recent.len() - tuning.repeat_window..]
    } else {
        &[]
    };

    LaneKind::ALL.map(|kind| {
        let weight = tuning.sections.get(kind).weight;
        if recent.contains(&kind) {
            weight * tuning.repeat_penalty
        } else {
            weight
        }
    })
}

/// Pick the next section kind and its length given the recent history
pub fn choose_section<R: Rng>(
    recent: &[LaneKind],
    tuning: &Tuning,
    rng: &mut R,
) -> (LaneKind, u32) {
    let weights = section_weights(recent, tuning);
    let kind = match WeightedIndex::new(weights) {
        Ok(dist) => LaneKind::ALL[dist.sample(rng)],
        Err(err) => {
            log::warn!("Unusable section weights {weights:?} ({err}), falling back to grass");
            LaneKind::Grass
        }
    };

    let profile = tuning.sections.get(kind);
    let length = rng.random_range(profile.min_len..=profile.max_len.max(profile.min_len));
    (kind, length)
}

/// Stateful planner: owns its RNG stream and the recent-kind history
#[derive(Debug, Clone)]
pub struct SectionPlanner {
    rng: Pcg32,
    recent: VecDeque<LaneKind>,
    history_len: usize,
}

impl SectionPlanner {
    pub fn new(rng: Pcg32, tuning: &Tuning) -> Self {
        Self {
            rng,
            recent: VecDeque::with_capacity(tuning.history_len + 1),
            history_len: tuning.history_len,
        }
    }

    /// Recently chosen section kinds, oldest first
    pub fn recent(&self) -> &VecDeque<LaneKind> {
        &self.recent
    }

    /// Plan the next section and remember its kind
    pub fn next_section(&mut self, tuning: &Tuning) -> (LaneKind, u32) {
        let (kind, length) = choose_section(self.recent.make_contiguous(), tuning, &mut self.rng);

        self.recent.push_back(kind);
        while self.recent.len() > self.history_len {
            self.recent.pop_front();
        }

        (kind, length)
    }
}
