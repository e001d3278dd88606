use serde::{Deserialize, Serialize};

use crate::data::event::RawJet;
use crate::data::object::SelectedObject;
use crate::kinematics::{delta_r, FourMomentum};

/// Jet selection configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JetCuts {
    pub min_pt: f64,
    pub max_abs_eta: f64,
    /// above this pt the pileup ID is not required
    pub pu_id_pt_threshold: f64,
    /// jets closer than this to a tight lepton are removed
    pub lepton_clean_dr: f64,
}

impl Default for JetCuts {
    fn default() -> Self {
        Self {
            min_pt: 20.0,
            max_abs_eta: 4.7,
            pu_id_pt_threshold: 50.0,
            lepton_clean_dr: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedJet {
    pub source_index: usize,
    pub p4: FourMomentum,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub btag: f64,
}

#[derive(Clone, Debug)]
pub struct JetSelector {
    cuts: JetCuts,
}

impl JetSelector {
    pub fn new(cuts: JetCuts) -> Self {
        JetSelector { cuts }
    }

    #[inline]
    pub fn passes(&self, j: &RawJet) -> bool {
        let c = &self.cuts;
        j.kin.pt > c.min_pt
            && j.kin.eta.abs() < c.max_abs_eta
            && j.jet_id
            && (j.pu_jet_id || j.kin.pt > c.pu_id_pt_threshold)
    }

    /// Select jets and clean them against good, isolated leptons.
    pub fn select(&self, jets: &[RawJet], leptons: &[SelectedObject]) -> Vec<SelectedJet> {
        let tight: Vec<&SelectedObject> = leptons
            .iter()
            .filter(|l| l.flavor.is_lepton() && l.flags.is_good && l.flags.pass_iso_fsr_corr)
            .collect();

        jets.iter()
            .enumerate()
            .filter(|(_, j)| self.passes(j))
            .filter(|(_, j)| {
                tight
                    .iter()
                    .all(|l| delta_r(j.kin.eta, j.kin.phi, l.eta, l.phi) >= self.cuts.lepton_clean_dr)
            })
            .map(|(i, j)| SelectedJet {
                source_index: i,
                p4: FourMomentum::from(j.kin),
                pt: j.kin.pt,
                eta: j.kin.eta,
                phi: j.kin.phi,
                btag: j.btag,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::object::{Flavor, ObjectFlags};
    use crate::kinematics::PtEtaPhiM;

    fn jet(pt: f64, eta: f64, phi: f64, pu_id: bool) -> RawJet {
        RawJet { kin: PtEtaPhiM::new(pt, eta, phi, 5.0), jet_id: true, pu_jet_id: pu_id, btag: 0.3 }
    }

    fn tight_muon(eta: f64, phi: f64) -> SelectedObject {
        SelectedObject {
            source_index: 0,
            flavor: Flavor::Muon,
            p4: FourMomentum::from_pt_eta_phi_m(30.0, eta, phi, 0.0),
            pt: 30.0,
            eta,
            phi,
            charge: 1,
            sip: Some(1.0),
            iso: Some(0.1),
            trigger_matched: false,
            flags: ObjectFlags { id: true, is_sip: true, is_good: true, pass_iso_fsr_corr: true, ..Default::default() },
        }
    }

    #[test]
    fn test_pileup_id_waived_at_high_pt() {
        let sel = JetSelector::new(JetCuts::default());
        assert!(!sel.passes(&jet(30.0, 0.0, 0.0, false)));
        assert!(sel.passes(&jet(60.0, 0.0, 0.0, false)));
        assert!(sel.passes(&jet(30.0, 0.0, 0.0, true)));
        assert!(!sel.passes(&jet(30.0, 4.8, 0.0, true)));
    }

    #[test]
    fn test_cleaning_against_leptons() {
        let sel = JetSelector::new(JetCuts::default());
        let jets = vec![jet(40.0, 0.0, 0.0, true), jet(40.0, 2.0, 2.0, true)];
        let out = sel.select(&jets, &[tight_muon(0.1, 0.1)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_index, 1);
        assert!((out[0].btag - 0.3).abs() < 1e-12);
    }
}
