//! Pair-of-pairs combinatorics (ZZ and Z + LL candidates).
//!
//! Every combination of two pairs is checked for shared legs, ghosts among
//! all six leg combinations and (optionally) total charge, then the roles
//! are assigned and the four-lepton quantities computed. Region predicates
//! are evaluated later on the finished candidates.

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::constants::MIN_MZ2;
use crate::data::object::SelectedObject;
use crate::data::pair::{Pair, PairFlavor};
use crate::data::quad::QuadCandidate;
use crate::data::region::RegionMask;
use crate::kinematics::FourMomentum;

/// How Z1 and Z2 are assigned within a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZRoles {
    /// Z1 is the pair closer to the nominal Z mass
    ByMass,
    /// Z1 is always the first input pair
    Fixed,
}

#[derive(Clone, Debug)]
pub struct QuadCombiner {
    z_mass: f64,
    ghost_dr: f64,
    check_charge: bool,
    roles: ZRoles,
}

impl QuadCombiner {
    pub fn new(z_mass: f64, ghost_dr: f64, check_charge: bool, roles: ZRoles) -> Self {
        QuadCombiner {
            z_mass,
            ghost_dr,
            check_charge,
            roles,
        }
    }

    /// Combine a pair collection with itself; every unordered pair of
    /// distinct pairs is tried once.
    pub fn combine_self(&self, pool: &[SelectedObject], pairs: &[Pair]) -> Vec<QuadCandidate> {
        let quads: Vec<QuadCandidate> = pairs
            .iter()
            .enumerate()
            .tuple_combinations()
            .filter_map(|(a, b)| self.build(pool, a, b))
            .collect();
        log::debug!("{} pairs -> {} quads", pairs.len(), quads.len());
        quads
    }

    /// Combine every pair of `first` with every pair of `second`.
    pub fn combine_cross(&self, pool: &[SelectedObject], first: &[Pair], second: &[Pair]) -> Vec<QuadCandidate> {
        let quads: Vec<QuadCandidate> = first
            .iter()
            .enumerate()
            .cartesian_product(second.iter().enumerate())
            .filter_map(|(a, b)| self.build(pool, a, b))
            .collect();
        log::debug!("{} x {} pairs -> {} quads", first.len(), second.len(), quads.len());
        quads
    }

    /// Build one candidate, or `None` if the combination is not admissible.
    pub fn build(
        &self,
        pool: &[SelectedObject],
        first: (usize, &Pair),
        second: (usize, &Pair),
    ) -> Option<QuadCandidate> {
        let (ia, a) = first;
        let (ib, b) = second;
        if a.shares_leg(b) {
            return None;
        }

        let all_legs = [a.legs[0], a.legs[1], b.legs[0], b.legs[1]];
        let min_ghost_dr = all_legs
            .iter()
            .tuple_combinations()
            .map(|(&i, &j)| pool[i].delta_r(&pool[j]))
            .fold(f64::INFINITY, f64::min);
        if min_ghost_dr <= self.ghost_dr {
            return None;
        }

        let has_tau = all_legs.iter().any(|&l| pool[l].flavor.is_tau());
        let charge_sum: i32 = all_legs.iter().map(|&l| pool[l].charge).sum();
        if self.check_charge && !has_tau && charge_sum != 0 {
            return None;
        }

        let swap = match self.roles {
            ZRoles::ByMass => (b.mass - self.z_mass).abs() < (a.mass - self.z_mass).abs(),
            ZRoles::Fixed => false,
        };
        let ((z1_index, z1), (z2_index, z2)) = if swap { ((ib, *b), (ia, *a)) } else { ((ia, *a), (ib, *b)) };

        let legs = [z1.legs[0], z1.legs[1], z2.legs[0], z2.legs[1]];
        let p4: FourMomentum = legs.iter().map(|&l| pool[l].p4).sum();

        let pts: Vec<f64> = legs.iter().map(|&l| OrderedFloat(pool[l].pt)).sorted().rev().map(|pt| pt.0).collect();

        // no opposite-charge combination (tau final states) leaves the cut open
        let m_ll4 = legs
            .iter()
            .tuple_combinations()
            .filter(|&(&i, &j)| pool[i].charge * pool[j].charge < 0)
            .map(|(&i, &j)| (pool[i].p4 + pool[j].p4).mass())
            .reduce(f64::min);

        let alternatives = alternative_pairings(pool, &z1, &z2);
        let (m_za, m_zb) = if (alternatives[0].mass - self.z_mass).abs() <= (alternatives[1].mass - self.z_mass).abs() {
            (alternatives[0].mass, alternatives[1].mass)
        } else {
            (alternatives[1].mass, alternatives[0].mass)
        };
        let pass_smart_mll = smart_mll(z1.mass, &alternatives, self.z_mass);

        let (d0, d1) = (&pool[z2.legs[0]], &pool[z2.legs[1]]);

        Some(QuadCandidate {
            z1_index,
            z2_index,
            z1,
            z2,
            legs,
            p4,
            mass: p4.mass(),
            charge_sum,
            has_tau,
            pt1: pts[0],
            pt2: pts[1],
            m_ll4,
            m_za,
            m_zb,
            pass_smart_mll,
            z2_sip: d0.passes_sip() && d1.passes_sip(),
            z2_tight: [d0.passes_tight(d1.flavor), d1.passes_tight(d0.flavor)],
            min_ghost_dr,
            good_leptons: false,
            z2_mass_window: false,
            m_all_comb: false,
            eligible: RegionMask::EMPTY,
            passes: RegionMask::EMPTY,
            best: RegionMask::EMPTY,
            full_sel: false,
        })
    }
}

/// One of the two pairings obtained by exchanging legs between Z1 and Z2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlternativePair {
    pub mass: f64,
    /// opposite-sign same-flavour light leptons
    pub ossf: bool,
}

/// The swapped pairings. With an opposite-sign Z2 each Z1 leg is paired
/// with the Z2 leg of opposite charge; otherwise the legs are crossed.
pub fn alternative_pairings(pool: &[SelectedObject], z1: &Pair, z2: &Pair) -> [AlternativePair; 2] {
    let [a0, a1] = z1.legs;
    let [b0, b1] = z2.legs;
    let combos = if z2.is_os() && pool[a0].charge != pool[b0].charge {
        [(a0, b0), (a1, b1)]
    } else {
        [(a0, b1), (a1, b0)]
    };
    combos.map(|(i, j)| {
        let (x, y) = (&pool[i], &pool[j]);
        AlternativePair {
            mass: (x.p4 + y.p4).mass(),
            ossf: x.charge * y.charge < 0 && PairFlavor::of(x.flavor, y.flavor).is_light_same_flavor(),
        }
    })
}

/// `passSmartMLL`: fails when a swapped OSSF pair is closer to the nominal
/// Z mass than Z1 while its partner does not exceed 12 GeV.
pub fn smart_mll(z1_mass: f64, alternatives: &[AlternativePair; 2], z_mass: f64) -> bool {
    let z1_distance = (z1_mass - z_mass).abs();
    !(0..2).any(|k| {
        let (alt, partner) = (&alternatives[k], &alternatives[1 - k]);
        alt.ossf && (alt.mass - z_mass).abs() < z1_distance && partner.mass <= MIN_MZ2
    })
}
