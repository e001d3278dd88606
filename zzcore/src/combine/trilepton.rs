//! Z + l candidates for the fake-rate measurement.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_MLL_ALL_COMB;
use crate::data::object::{Flavor, SelectedObject};
use crate::data::pair::Pair;
use crate::kinematics::FourMomentum;

/// The best Z of the event plus one extra lepton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZlCandidate {
    /// index of the Z in the pair collection
    pub z_index: usize,
    pub z: Pair,
    /// index of the extra lepton in the object pool
    pub lepton: usize,
    pub lepton_flavor: Flavor,
    pub p4: FourMomentum,
    pub mass: f64,
    /// extra lepton passes ID, SIP and isolation
    pub lepton_tight: bool,
}

#[derive(Clone, Debug)]
pub struct TrileptonCombiner {
    ghost_dr: f64,
}

impl TrileptonCombiner {
    pub fn new(ghost_dr: f64) -> Self {
        TrileptonCombiner { ghost_dr }
    }

    /// Combine the preselected best Z with every other lepton of the pool.
    pub fn combine(&self, pool: &[SelectedObject], pairs: &[Pair]) -> Vec<ZlCandidate> {
        let mut out = Vec::new();
        for (z_index, z) in pairs.iter().enumerate() {
            if !(z.is_best_z && z.z1_presel) {
                continue;
            }
            for (l, lep) in pool.iter().enumerate() {
                if !lep.flavor.is_lepton() || z.legs.contains(&l) {
                    continue;
                }
                if self.admissible(pool, z, lep) {
                    let p4 = z.p4 + lep.p4;
                    out.push(ZlCandidate {
                        z_index,
                        z: *z,
                        lepton: l,
                        lepton_flavor: lep.flavor,
                        p4,
                        mass: p4.mass(),
                        lepton_tight: lep.passes_tight(pool[z.legs[0]].flavor),
                    });
                }
            }
        }
        log::debug!("{} Z+l candidates", out.len());
        out
    }

    fn admissible(&self, pool: &[SelectedObject], z: &Pair, lep: &SelectedObject) -> bool {
        z.legs.iter().all(|&i| {
            let leg = &pool[i];
            let separated = leg.delta_r(lep) > self.ghost_dr;
            // opposite-charge combinations with the Z legs must not be too light
            let heavy_enough = leg.charge * lep.charge >= 0 || (leg.p4 + lep.p4).mass() > MIN_MLL_ALL_COMB;
            separated && heavy_enough
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::object::ObjectFlags;

    fn lepton(flavor: Flavor, pt: f64, eta: f64, phi: f64, charge: i32, tight: bool) -> SelectedObject {
        SelectedObject {
            source_index: 0,
            flavor,
            p4: FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.0),
            pt,
            eta,
            phi,
            charge,
            sip: Some(1.0),
            iso: Some(0.1),
            trigger_matched: true,
            flags: ObjectFlags {
                id: true,
                is_sip: true,
                is_good: true,
                is_iso_fsr_uncorr: tight,
                pass_iso_fsr_corr: tight,
                tau: None,
            },
        }
    }

    fn best_z(pool: &[SelectedObject]) -> Pair {
        let mut z = Pair::build(pool, 0, 1, false, true, |_| true);
        z.is_best_z = true;
        z
    }

    #[test]
    fn test_extra_leptons() {
        let pool = vec![
            lepton(Flavor::Muon, 45.0, 0.0, 0.0, 1, true),
            lepton(Flavor::Muon, 45.0, 0.0, 3.0, -1, true),
            lepton(Flavor::Electron, 15.0, 1.0, 1.5, 1, false),
            // ghost of leg 0
            lepton(Flavor::Electron, 15.0, 0.005, 0.005, -1, true),
            // collinear with leg 0 and opposite charge: mass below 4
            lepton(Flavor::Muon, 5.0, 0.05, 0.05, -1, true),
        ];
        let z = best_z(&pool);
        let out = TrileptonCombiner::new(0.02).combine(&pool, &[z]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].lepton, 2);
        assert!(!out[0].lepton_tight);
        let expected = (pool[0].p4 + pool[1].p4 + pool[2].p4).mass();
        assert!((out[0].mass - expected).abs() < 1e-9);
    }

    #[test]
    fn test_requires_best_preselected_z() {
        let pool = vec![
            lepton(Flavor::Muon, 45.0, 0.0, 0.0, 1, true),
            lepton(Flavor::Muon, 45.0, 0.0, 3.0, -1, true),
            lepton(Flavor::Muon, 15.0, 1.0, 1.5, 1, true),
        ];
        let mut z = best_z(&pool);
        z.is_best_z = false;
        assert!(TrileptonCombiner::new(0.02).combine(&pool, &[z]).is_empty());
        z.is_best_z = true;
        z.z1_presel = false;
        assert!(TrileptonCombiner::new(0.02).combine(&pool, &[z]).is_empty());
    }
}
