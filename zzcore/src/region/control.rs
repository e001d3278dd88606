//! Z + LL control regions.
//!
//! Candidates are built with fixed roles: Z1 is the Z pair, Z2 the loose LL
//! pair. Same-sign LL gives `CRZLLss`; opposite-sign LL is split by the
//! number of LL legs passing the tight selection into `CRZLLos_3P1F`
//! (exactly one) and `CRZLLos_2P2F` (none).

use crate::config::RunPeriodConstants;
use crate::constants::MIN_M4L;
use crate::data::quad::QuadCandidate;
use crate::data::region::Region;
use crate::region::setup::{best_z1, hlt_match, m4l_above, mll_all_comb, pt20_10, z2_mass, SelectionSetup};

/// Z1 preselected with isolated legs, both LL legs passing SIP.
pub fn bestcand_base_aa(q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
    q.z1.z1_presel && q.z1.worst_iso_below(c.ele_iso_cut, c.mu_iso_cut) && q.z2_sip
}

/// LL is mumu, ee, or involves a tau.
#[inline]
pub fn z2_ll(q: &QuadCandidate) -> bool {
    q.z2.flavor.same_flavor_or_tau()
}

#[inline]
pub fn z2_ll_ss(q: &QuadCandidate) -> bool {
    z2_ll(q) && q.z2.is_ss()
}

#[inline]
pub fn z2_ll_os(q: &QuadCandidate) -> bool {
    z2_ll(q) && q.z2.is_os()
}

/// Kinematic selection shared by the control regions.
pub fn base_sel(q: &QuadCandidate) -> bool {
    z2_mass(q) && mll_all_comb(q) && pt20_10(q) && m4l_above(q, MIN_M4L)
}

/// Opposite-sign best-candidate base.
pub fn bestzll_os(q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
    bestcand_base_aa(q, c) && base_sel(q) && z2_ll_os(q) && q.pass_smart_mll && hlt_match(q) && best_z1(q)
}

#[derive(Clone, Debug)]
pub struct ControlRegionClassifier {
    setup: SelectionSetup,
    constants: RunPeriodConstants,
}

impl ControlRegionClassifier {
    pub fn new(setup: SelectionSetup, constants: &RunPeriodConstants) -> Self {
        ControlRegionClassifier {
            setup,
            constants: constants.clone(),
        }
    }

    /// Set the best-candidate preselection and flag bits of the three
    /// control regions. The best bits are left to the arbitrator.
    pub fn classify(&self, q: &mut QuadCandidate) {
        let c = &self.constants;
        let os = bestzll_os(q, c);
        let passing = q.z2_pass_count();
        let ss_among = self.setup.crzll_ss_among(q, c);
        let ss_flag = base_sel(q);

        q.eligible.set(Region::CrZllSs, ss_among);
        q.eligible.set(Region::CrZllOs3P1F, os && passing >= 1);
        q.eligible.set(Region::CrZllOs2P2F, os);

        q.passes.set(Region::CrZllSs, ss_flag);
        q.passes.set(Region::CrZllOs3P1F, os && passing == 1);
        q.passes.set(Region::CrZllOs2P2F, os && passing == 0);
    }

    pub fn classify_all(&self, quads: &mut [QuadCandidate]) {
        quads.iter_mut().for_each(|q| self.classify(q));
    }
}
