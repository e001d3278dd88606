use serde::{Deserialize, Serialize};

use crate::data::pair::Pair;
use crate::data::region::{Region, RegionMask};
use crate::kinematics::FourMomentum;

/// A four-lepton candidate built from two pairs (ZZ, or Z + LL for the
/// control regions). `z1`/`z2` are copies of the input pairs after role
/// assignment; the legs still point into the event's object pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadCandidate {
    /// index of Z1 in the collection it was taken from
    pub z1_index: usize,
    /// index of Z2 in the collection it was taken from
    pub z2_index: usize,
    pub z1: Pair,
    pub z2: Pair,
    /// Z1 legs followed by Z2 legs
    pub legs: [usize; 4],
    pub p4: FourMomentum,
    pub mass: f64,
    pub charge_sum: i32,
    pub has_tau: bool,
    /// leading and subleading leg pt
    pub pt1: f64,
    pub pt2: f64,
    /// smallest opposite-charge two-leg mass among the four legs, `None`
    /// when no opposite-charge combination exists
    #[serde(rename = "mLL4")]
    pub m_ll4: Option<f64>,
    /// swapped pairing closer to the nominal Z mass, and its partner
    #[serde(rename = "mZa")]
    pub m_za: f64,
    #[serde(rename = "mZb")]
    pub m_zb: f64,
    #[serde(rename = "passSmartMLL")]
    pub pass_smart_mll: bool,
    /// both Z2 legs pass the SIP cut
    #[serde(rename = "Z2SIP")]
    pub z2_sip: bool,
    /// tight selection of each Z2 leg
    pub z2_tight: [bool; 2],
    /// smallest leg-to-leg separation over all six combinations
    pub min_ghost_dr: f64,
    /// four tight leptons with isolated pairs
    #[serde(rename = "GoodLeptons")]
    pub good_leptons: bool,
    /// 4 < m(Z2) < 140
    #[serde(rename = "Z2Mass")]
    pub z2_mass_window: bool,
    /// mLL4 > 4
    #[serde(rename = "MAllComb")]
    pub m_all_comb: bool,
    /// best-candidate preselection per region
    pub eligible: RegionMask,
    /// region flags
    pub passes: RegionMask,
    /// best candidate of the event per region
    pub best: RegionMask,
    /// SR and m4l > 100
    #[serde(rename = "FullSel")]
    pub full_sel: bool,
}

impl QuadCandidate {
    #[inline]
    pub fn is_best(&self, region: Region) -> bool {
        self.best.contains(region)
    }

    /// A candidate belongs to a region when it is the best one there and
    /// carries the region flag.
    #[inline]
    pub fn in_region(&self, region: Region) -> bool {
        self.best.contains(region) && self.passes.contains(region)
    }

    /// Number of Z2 legs passing the tight selection.
    pub fn z2_pass_count(&self) -> usize {
        self.z2_tight.iter().filter(|p| **p).count()
    }
}
