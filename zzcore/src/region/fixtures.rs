//! Hand-made candidates for the region tests.

use crate::data::pair::{Pair, PairFlavor};
use crate::data::quad::QuadCandidate;
use crate::data::region::RegionMask;
use crate::kinematics::FourMomentum;

/// A tight, trigger-matched mumu pair flagged as best Z.
pub fn pair(mass: f64, legs: [usize; 2]) -> Pair {
    Pair {
        legs,
        p4: FourMomentum::default(),
        mass,
        flavor: PairFlavor::MuMu,
        charge_product: -1,
        sum_pt: 60.0,
        good_leptons: true,
        good_iso_leptons: true,
        good_taus: true,
        iso_leptons: true,
        z1_presel: true,
        ele_hlt_match: false,
        mu_hlt_match: true,
        worst_ele_iso: None,
        worst_mu_iso: Some(0.1),
        is_best_z: true,
    }
}

/// A 130 GeV candidate passing every signal-region cut for a Z2 above 12 GeV.
pub fn quad(z1_mass: f64, z2_mass: f64) -> QuadCandidate {
    QuadCandidate {
        z1_index: 0,
        z2_index: 1,
        z1: pair(z1_mass, [0, 1]),
        z2: pair(z2_mass, [2, 3]),
        legs: [0, 1, 2, 3],
        p4: FourMomentum::default(),
        mass: 130.0,
        charge_sum: 0,
        has_tau: false,
        pt1: 40.0,
        pt2: 35.0,
        m_ll4: Some(z2_mass),
        m_za: 60.0,
        m_zb: 50.0,
        pass_smart_mll: true,
        z2_sip: true,
        z2_tight: [true, true],
        min_ghost_dr: 1.0,
        good_leptons: true,
        z2_mass_window: true,
        m_all_comb: true,
        eligible: RegionMask::EMPTY,
        passes: RegionMask::EMPTY,
        best: RegionMask::EMPTY,
        full_sel: false,
    }
}
