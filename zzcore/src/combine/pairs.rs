//! Pair combinatorics (Z and LL candidates).

use std::cmp::Ordering;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::config::RunPeriodConstants;
use crate::data::event::TriggerBits;
use crate::data::object::SelectedObject;
use crate::data::pair::Pair;

/// Which pair collection is being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairMode {
    /// l+l- candidates for the signal region: charge check, loose/tight filter.
    Z,
    /// any-charge candidates for the control regions: ghost protection, no charge check.
    LooseLL,
}

/// Output of one pair-building pass.
#[derive(Clone, Debug, Default)]
pub struct PairBuild {
    pub pairs: Vec<Pair>,
    /// number of unordered 2-combinations enumerated before any filter
    pub raw_combinations: usize,
}

#[derive(Clone, Debug)]
pub struct PairCombiner {
    constants: RunPeriodConstants,
    keep_loose: bool,
    check_charge: bool,
}

impl PairCombiner {
    pub fn new(constants: &RunPeriodConstants, keep_loose: bool, check_charge: bool) -> Self {
        PairCombiner {
            constants: constants.clone(),
            keep_loose,
            check_charge,
        }
    }

    /// Enumerate every 2-combination of leptons in the pool, keep the
    /// admissible ones and flag the best Z.
    pub fn combine(&self, pool: &[SelectedObject], trigger: &TriggerBits, mode: PairMode) -> PairBuild {
        let leptons: Vec<usize> = (0..pool.len()).filter(|&i| pool[i].flavor.is_lepton()).collect();
        let ele_fired = trigger.any_fired(&self.constants.single_ele_paths);
        let mu_fired = trigger.any_fired(&self.constants.single_mu_paths);

        let mut raw_combinations = 0usize;
        let mut pairs: Vec<Pair> = Vec::new();

        for (i, j) in leptons.iter().copied().tuple_combinations() {
            raw_combinations += 1;
            let (a, b) = (&pool[i], &pool[j]);
            if !self.admissible(a, b, mode) {
                continue;
            }
            let pair = Pair::build(pool, i, j, ele_fired, mu_fired, |m| self.constants.in_z1_window(m));
            if !(pair.mass > 0.0 && pair.flavor.same_flavor_or_tau()) {
                continue;
            }
            if mode == PairMode::Z && !self.keep_loose && !pair.good_iso_leptons {
                continue;
            }
            pairs.push(pair);
        }

        if let Some(best) = best_z_index(&pairs, self.constants.z_mass) {
            pairs[best].is_best_z = true;
        }

        log::debug!(
            "{:?} pairs: {} raw combinations, {} kept",
            mode,
            raw_combinations,
            pairs.len()
        );

        PairBuild { pairs, raw_combinations }
    }

    fn admissible(&self, a: &SelectedObject, b: &SelectedObject, mode: PairMode) -> bool {
        match mode {
            PairMode::Z => {
                // taus keep every charge combination
                !self.check_charge || a.flavor.is_tau() || b.flavor.is_tau() || a.charge * b.charge < 0
            }
            PairMode::LooseLL => a.delta_r(b) > self.constants.ghost_dr,
        }
    }
}

/// Best-Z preselection: Z1 preselection, isolated legs and a flavour-matched
/// trigger match.
#[inline]
pub fn best_z_eligible(p: &Pair) -> bool {
    p.z1_presel && p.iso_leptons && p.trigger_match()
}

/// Order two pairs for the best-Z choice: mass closer to nominal first,
/// then the larger scalar sum of leg pt.
pub fn compare_z_candidates(a: &Pair, b: &Pair, z_mass: f64) -> Ordering {
    let da = OrderedFloat((a.mass - z_mass).abs());
    let db = OrderedFloat((b.mass - z_mass).abs());
    da.cmp(&db).then_with(|| OrderedFloat(b.sum_pt).cmp(&OrderedFloat(a.sum_pt)))
}

/// Index of the best Z among the eligible pairs; earlier index wins full ties.
pub fn best_z_index(pairs: &[Pair], z_mass: f64) -> Option<usize> {
    pairs
        .iter()
        .enumerate()
        .filter(|(_, p)| best_z_eligible(p))
        .min_by(|(ia, a), (ib, b)| compare_z_candidates(a, b, z_mass).then(ia.cmp(ib)))
        .map(|(i, _)| i)
}
