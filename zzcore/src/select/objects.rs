//! Object selection.
//!
//! Applies the per-flavour preselection cuts to the calibrated objects of one
//! event and computes the named lepton flags (`ID`, `isSIP`, `isGood`,
//! `isIsoFSRUncorr`, `passCombRelIsoPFFSRCorr`, tau goodness). Objects
//! failing their cut are dropped, not flagged.

use serde::{Deserialize, Serialize};

use crate::config::RunPeriodConstants;
use crate::constants::MAX_SIP;
use crate::data::object::{
    Flavor, ObjectFlags, RawObject, SelectedObject, TauDiscriminants, TauGoodness, TauWorkingPoint,
};
use crate::kinematics::{delta_r, FourMomentum};

/// Kinematic and impact-parameter cuts for one lepton flavour.
/// A missing impact-parameter bound means no cut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeptonCuts {
    pub min_pt: f64,
    pub max_abs_eta: f64,
    #[serde(default)]
    pub max_dxy: Option<f64>,
    #[serde(default)]
    pub max_dz: Option<f64>,
}

impl LeptonCuts {
    fn impact_parameter_ok(&self, dxy: f64, dz: f64) -> bool {
        self.max_dxy.is_none_or(|m| dxy.abs() < m) && self.max_dz.is_none_or(|m| dz.abs() < m)
    }
}

/// Object selection cut table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectCuts {
    pub muon: LeptonCuts,
    pub electron: LeptonCuts,
    pub tau: LeptonCuts,
    pub photon_min_pt: f64,
    pub photon_max_abs_eta: f64,
    pub max_sip: f64,
    /// electrons closer than this to a good muon are removed
    pub electron_muon_clean_dr: f64,
}

impl Default for ObjectCuts {
    fn default() -> Self {
        Self {
            muon: LeptonCuts { min_pt: 5.0, max_abs_eta: 2.4, max_dxy: Some(0.5), max_dz: Some(1.0) },
            electron: LeptonCuts { min_pt: 7.0, max_abs_eta: 2.5, max_dxy: Some(0.5), max_dz: Some(1.0) },
            // taus: no dxy requirement, dz enters GOODTAU instead
            tau: LeptonCuts { min_pt: 20.0, max_abs_eta: 2.3, max_dxy: None, max_dz: None },
            photon_min_pt: 2.0,
            photon_max_abs_eta: 2.4,
            max_sip: MAX_SIP,
            electron_muon_clean_dr: 0.05,
        }
    }
}

/// Selects the object pool of one event.
#[derive(Clone, Debug)]
pub struct ObjectSelector {
    cuts: ObjectCuts,
    constants: RunPeriodConstants,
}

impl ObjectSelector {
    pub fn new(cuts: ObjectCuts, constants: &RunPeriodConstants) -> Self {
        ObjectSelector {
            cuts,
            constants: constants.clone(),
        }
    }

    pub fn cuts(&self) -> &ObjectCuts {
        &self.cuts
    }

    /// Run the selection on the raw objects of one event.
    ///
    /// The output keeps the input order; electrons overlapping with a good
    /// muon are removed after the flags are computed.
    pub fn select(&self, objects: &[RawObject]) -> Vec<SelectedObject> {
        let selected: Vec<SelectedObject> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| self.passes_preselection(o))
            .map(|(i, o)| self.decorate(i, o))
            .collect();

        let good_muons: Vec<(f64, f64)> = selected
            .iter()
            .filter(|o| o.flavor == Flavor::Muon && o.flags.is_good)
            .map(|o| (o.eta, o.phi))
            .collect();

        let clean_dr = self.cuts.electron_muon_clean_dr;
        selected
            .into_iter()
            .filter(|o| {
                o.flavor != Flavor::Electron
                    || good_muons.iter().all(|&(eta, phi)| delta_r(o.eta, o.phi, eta, phi) >= clean_dr)
            })
            .collect()
    }

    /// Kinematic, track and impact-parameter preselection.
    pub fn passes_preselection(&self, o: &RawObject) -> bool {
        let pt = o.kin.pt;
        let abs_eta = o.kin.eta.abs();
        if !pt.is_finite() || !o.kin.eta.is_finite() || !o.kin.phi.is_finite() {
            return false;
        }
        match o.flavor {
            Flavor::Muon => {
                let c = &self.cuts.muon;
                let track_ok = match o.deco.muon {
                    Some(t) => (t.is_global || (t.is_tracker && t.n_matches > 0)) && t.best_track_type != 2,
                    None => false,
                };
                pt > c.min_pt && abs_eta < c.max_abs_eta && track_ok && c.impact_parameter_ok(o.deco.dxy, o.deco.dz)
            }
            Flavor::Electron => {
                let c = &self.cuts.electron;
                pt > c.min_pt && abs_eta < c.max_abs_eta && c.impact_parameter_ok(o.deco.dxy, o.deco.dz)
            }
            Flavor::Tau => {
                let c = &self.cuts.tau;
                pt > c.min_pt && abs_eta < c.max_abs_eta && c.impact_parameter_ok(o.deco.dxy, o.deco.dz)
            }
            Flavor::Photon => pt > self.cuts.photon_min_pt && abs_eta < self.cuts.photon_max_abs_eta,
        }
    }

    fn decorate(&self, source_index: usize, o: &RawObject) -> SelectedObject {
        let flags = match o.flavor {
            Flavor::Electron | Flavor::Muon => self.lepton_flags(o),
            Flavor::Tau => tau_flags(o.deco.tau.as_ref(), o.deco.dz),
            Flavor::Photon => ObjectFlags::default(),
        };
        let (sip, iso) = match o.flavor {
            Flavor::Electron | Flavor::Muon => (
                Some(o.deco.sip).filter(|s| s.is_finite()),
                Some(o.deco.comb_rel_iso_fsr_corr.unwrap_or(o.deco.comb_rel_iso)).filter(|i| i.is_finite()),
            ),
            Flavor::Tau | Flavor::Photon => (None, None),
        };
        SelectedObject {
            source_index,
            flavor: o.flavor,
            p4: FourMomentum::from(o.kin),
            pt: o.kin.pt,
            eta: o.kin.eta,
            phi: o.kin.phi,
            charge: o.charge,
            sip,
            iso,
            trigger_matched: o.deco.trigger_matched,
            flags,
        }
    }

    fn lepton_flags(&self, o: &RawObject) -> ObjectFlags {
        let iso_cut = self.constants.iso_cut(o.flavor).unwrap_or(f64::INFINITY);
        let is_sip = o.deco.sip < self.cuts.max_sip;
        let id = o.deco.id;
        let corrected = o.deco.comb_rel_iso_fsr_corr.unwrap_or(o.deco.comb_rel_iso);
        ObjectFlags {
            id,
            is_sip,
            is_good: id && is_sip,
            is_iso_fsr_uncorr: o.deco.comb_rel_iso < iso_cut,
            pass_iso_fsr_corr: corrected < iso_cut,
            tau: None,
        }
    }
}

/// `GOODTAU`: decay modes 5 and 6 rejected, new-DM decay mode finding and
/// dz requirement.
fn good_tau(d: &TauDiscriminants, dz: f64) -> bool {
    d.decay_mode != 5 && d.decay_mode != 6 && d.decay_mode_finding_new_dms && dz.abs() < 1.0
}

fn tau_flags(disc: Option<&TauDiscriminants>, dz: f64) -> ObjectFlags {
    let Some(d) = disc else {
        return ObjectFlags { tau: Some(TauGoodness::default()), ..Default::default() };
    };
    use TauWorkingPoint::*;
    let base = good_tau(d, dz);
    let goodness = TauGoodness {
        vs_mu: base && d.passes_vs_mu(Tight) && d.passes_vs_e(VLoose) && d.passes_vs_jet(Tight),
        vs_ele: base && d.passes_vs_mu(Tight) && d.passes_vs_e(Medium) && d.passes_vs_jet(Medium),
        vs_tau: base && d.passes_vs_mu(Tight) && d.passes_vs_e(VLoose) && d.passes_vs_jet(Tight),
    };
    // taus carry no SIP or PF isolation; ID and isGood are GOODTAU
    ObjectFlags {
        id: base,
        is_sip: true,
        is_good: base,
        is_iso_fsr_uncorr: true,
        pass_iso_fsr_corr: true,
        tau: Some(goodness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::object::{Decorations, MuonTrackInfo};
    use crate::kinematics::PtEtaPhiM;

    fn selector() -> ObjectSelector {
        ObjectSelector::new(ObjectCuts::default(), &RunPeriodConstants::default())
    }

    fn muon(pt: f64, eta: f64, phi: f64, sip: f64, iso: f64) -> RawObject {
        RawObject::new(
            Flavor::Muon,
            PtEtaPhiM::new(pt, eta, phi, 0.105),
            -1,
            Decorations {
                id: true,
                sip,
                comb_rel_iso: iso,
                muon: Some(MuonTrackInfo { is_global: true, ..Default::default() }),
                ..Default::default()
            },
        )
    }

    fn electron(pt: f64, eta: f64, phi: f64) -> RawObject {
        RawObject::new(
            Flavor::Electron,
            PtEtaPhiM::new(pt, eta, phi, 0.0),
            1,
            Decorations { id: true, sip: 1.0, comb_rel_iso: 5.0, ..Default::default() },
        )
    }

    #[test]
    fn test_muon_flags() {
        let sel = selector();
        let out = sel.select(&[muon(20.0, 0.1, 0.2, 3.0, 0.2), muon(20.0, 1.0, 2.0, 4.0, 0.5)]);
        assert_eq!(out.len(), 2);
        assert!(out[0].flags.is_sip && out[0].flags.is_good && out[0].flags.pass_iso_fsr_corr);
        // SIP < 4 is strict, iso 0.5 fails the 0.35 cut
        assert!(!out[1].flags.is_sip);
        assert!(!out[1].flags.is_good);
        assert!(!out[1].flags.is_iso_fsr_uncorr);
        assert_eq!(out[1].source_index, 1);
    }

    #[test]
    fn test_failing_objects_are_dropped() {
        let sel = selector();
        let mut no_track = muon(20.0, 0.0, 0.0, 1.0, 0.1);
        no_track.deco.muon = None;
        let mut standalone = muon(20.0, 0.0, 0.0, 1.0, 0.1);
        standalone.deco.muon = Some(MuonTrackInfo { is_global: true, best_track_type: 2, ..Default::default() });
        let out = sel.select(&[
            muon(4.0, 0.0, 0.0, 1.0, 0.1),
            muon(20.0, 2.45, 0.0, 1.0, 0.1),
            no_track,
            standalone,
            electron(6.5, 0.0, 0.0),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_electron_isolation_disabled() {
        let sel = selector();
        let out = sel.select(&[electron(15.0, 0.0, 1.0)]);
        assert_eq!(out.len(), 1);
        assert!(out[0].flags.pass_iso_fsr_corr);
        assert!(out[0].flags.is_good);
    }

    #[test]
    fn test_electron_cleaned_against_good_muon() {
        let sel = selector();
        let out = sel.select(&[muon(20.0, 0.5, 1.0, 1.0, 0.1), electron(15.0, 0.52, 1.0), electron(15.0, -0.5, 1.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].flavor, Flavor::Muon);
        assert_eq!(out[1].source_index, 2);
    }

    #[test]
    fn test_fsr_corrected_isolation_is_preferred() {
        let sel = selector();
        let mut m = muon(20.0, 0.0, 0.0, 1.0, 0.5);
        m.deco.comb_rel_iso_fsr_corr = Some(0.2);
        let out = sel.select(&[m]);
        assert!(!out[0].flags.is_iso_fsr_uncorr);
        assert!(out[0].flags.pass_iso_fsr_corr);
        assert!(out[0].iso.is_some_and(|iso| (iso - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_tau_goodness_by_partner() {
        use TauWorkingPoint::*;
        let sel = selector();
        let disc = TauDiscriminants {
            decay_mode: 1,
            decay_mode_finding_new_dms: true,
            vs_e: Some(VLoose),
            vs_mu: Some(Tight),
            vs_jet: Some(Tight),
        };
        let tau = RawObject::new(
            Flavor::Tau,
            PtEtaPhiM::new(30.0, 0.0, 0.0, 1.2),
            1,
            Decorations { dz: 0.2, tau: Some(disc), ..Default::default() },
        );
        let out = sel.select(&[tau.clone()]);
        assert_eq!(out.len(), 1);
        let t = &out[0];
        assert!(t.flags.is_good);
        assert!(t.is_good_tau_against(Flavor::Muon));
        assert!(t.is_good_tau_against(Flavor::Tau));
        // vsE Medium needed against electrons
        assert!(!t.is_good_tau_against(Flavor::Electron));

        let mut dm5 = tau;
        if let Some(d) = dm5.deco.tau.as_mut() {
            d.decay_mode = 5;
        }
        let out = sel.select(&[dm5]);
        assert!(!out[0].flags.is_good);
        assert!(!out[0].is_good_tau_against(Flavor::Muon));
    }
}
