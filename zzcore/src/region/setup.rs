//! Signal-region selection setups.
//!
//! A setup fixes two predicates: which candidates the best one is chosen
//! among (`best_cand_among`), and the signal-region flag applied on top
//! (`signal_region`). It is picked once per job from its name.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::config::RunPeriodConstants;
use crate::constants::{
    MIN_M4L, MIN_M4L_FULLSEL, MIN_MLL_ALL_COMB, MIN_MZ2, MIN_PT_LEADING, MIN_PT_SUBLEADING, Z2_MASS_HIGH, Z2_MASS_LOW,
};
use crate::data::quad::QuadCandidate;
use crate::error::Error;
use crate::region::control::{bestcand_base_aa, z2_ll_ss};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionSetup {
    /// best candidate among those passing every cut
    AllCutsAtOnce,
    /// every cut but mZ2 > 12, which is applied on the best candidate only
    AllCutsAtOnceButMZ2,
    /// all cuts plus mZb > 12
    AllCutsAtOncePlusMZb,
    /// all cuts with the swapped-pair guard, trigger match and best Z1
    AllCutsAtOncePlusSmart,
}

impl SelectionSetup {
    pub const ALL: [SelectionSetup; 4] = [
        SelectionSetup::AllCutsAtOnce,
        SelectionSetup::AllCutsAtOnceButMZ2,
        SelectionSetup::AllCutsAtOncePlusMZb,
        SelectionSetup::AllCutsAtOncePlusSmart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SelectionSetup::AllCutsAtOnce => "allCutsAtOnce",
            SelectionSetup::AllCutsAtOnceButMZ2 => "allCutsAtOnceButMZ2",
            SelectionSetup::AllCutsAtOncePlusMZb => "allCutsAtOncePlusMZb",
            SelectionSetup::AllCutsAtOncePlusSmart => "allCutsAtOncePlusSmart",
        }
    }

    /// Preselection of the candidates competing for the SR best candidate.
    pub fn best_cand_among(&self, q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
        let base = four_good_leptons(q, c) && z1_mass(q, c) && z2_mass(q) && pt20_10(q) && m4l_above(q, MIN_M4L);
        match self {
            SelectionSetup::AllCutsAtOnce => base && mll_all_comb(q) && z2_above_12(q),
            SelectionSetup::AllCutsAtOnceButMZ2 => base && mll_all_comb(q),
            SelectionSetup::AllCutsAtOncePlusMZb => base && mll_all_comb(q) && z2_above_12(q) && mzb_above_12(q),
            SelectionSetup::AllCutsAtOncePlusSmart => base && hlt_match(q) && best_z1(q) && q.pass_smart_mll,
        }
    }

    /// Signal-region flag.
    pub fn signal_region(&self, q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
        match self {
            SelectionSetup::AllCutsAtOnceButMZ2 => self.best_cand_among(q, c) && z2_above_12(q),
            _ => self.best_cand_among(q, c),
        }
    }

    /// `FullSel`: signal region and m4l > 100.
    pub fn full_sel(&self, q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
        self.signal_region(q, c) && m4l_above(q, MIN_M4L_FULLSEL)
    }

    /// Same-sign Z + LL best-candidate preselection, fixed roles.
    pub fn crzll_ss_among(&self, q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
        let base = bestcand_base_aa(q, c)
            && z2_ll_ss(q)
            && z2_mass(q)
            && mll_all_comb(q)
            && pt20_10(q)
            && m4l_above(q, MIN_M4L);
        match self {
            SelectionSetup::AllCutsAtOnceButMZ2 => base,
            SelectionSetup::AllCutsAtOnce => base && z2_above_12(q),
            SelectionSetup::AllCutsAtOncePlusMZb => base && z2_above_12(q) && mzb_above_12(q),
            SelectionSetup::AllCutsAtOncePlusSmart => base && q.pass_smart_mll && hlt_match(q) && best_z1(q),
        }
    }
}

impl FromStr for SelectionSetup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Legacy" {
            return Err(Error::DeprecatedSelectionSetup(s.to_string()));
        }
        SelectionSetup::ALL
            .into_iter()
            .find(|setup| setup.name() == s)
            .ok_or_else(|| Error::UnknownSelectionSetup(s.to_string()))
    }
}

impl Display for SelectionSetup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---- named cuts ----

/// Four tight leptons: good legs, good taus, worst isolations below the cuts.
pub fn four_good_leptons(q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
    [&q.z1, &q.z2]
        .iter()
        .all(|p| p.good_leptons && p.good_taus && p.worst_iso_below(c.ele_iso_cut, c.mu_iso_cut))
}

/// Z1 inside the Z1 preselection window.
#[inline]
pub fn z1_mass(q: &QuadCandidate, c: &RunPeriodConstants) -> bool {
    c.in_z1_window(q.z1.mass)
}

#[inline]
pub fn z2_mass(q: &QuadCandidate) -> bool {
    q.z2.mass > Z2_MASS_LOW && q.z2.mass < Z2_MASS_HIGH
}

#[inline]
pub fn mll_all_comb(q: &QuadCandidate) -> bool {
    q.m_ll4.is_none_or(|m| m > MIN_MLL_ALL_COMB)
}

#[inline]
pub fn pt20_10(q: &QuadCandidate) -> bool {
    q.pt1 > MIN_PT_LEADING && q.pt2 > MIN_PT_SUBLEADING
}

#[inline]
pub fn m4l_above(q: &QuadCandidate, cut: f64) -> bool {
    q.mass > cut
}

#[inline]
pub fn z2_above_12(q: &QuadCandidate) -> bool {
    q.z2.mass > MIN_MZ2
}

#[inline]
pub fn mzb_above_12(q: &QuadCandidate) -> bool {
    q.m_zb > MIN_MZ2
}

/// Flavour-matched trigger match of Z1.
#[inline]
pub fn hlt_match(q: &QuadCandidate) -> bool {
    q.z1.trigger_match()
}

#[inline]
pub fn best_z1(q: &QuadCandidate) -> bool {
    q.z1.is_best_z
}

/// Store the outcome of the `GoodLeptons`, `Z2Mass` and `MAllComb` cuts on
/// the candidate.
pub fn record_cut_flags(q: &mut QuadCandidate, c: &RunPeriodConstants) {
    let good_leptons = four_good_leptons(q, c);
    let z2_mass_window = z2_mass(q);
    let m_all_comb = mll_all_comb(q);
    q.good_leptons = good_leptons;
    q.z2_mass_window = z2_mass_window;
    q.m_all_comb = m_all_comb;
}
