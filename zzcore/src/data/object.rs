use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::constants::{PDG_ELECTRON, PDG_MUON, PDG_PHOTON, PDG_TAU};
use crate::kinematics::{delta_r, FourMomentum, PtEtaPhiM};

/// Represents the flavour of a reconstructed physics object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Electron,
    Muon,
    Tau,
    Photon,
}

impl Flavor {
    /// Absolute PDG id of the flavour.
    pub fn pdg_id(&self) -> i32 {
        match self {
            Flavor::Electron => PDG_ELECTRON,
            Flavor::Muon => PDG_MUON,
            Flavor::Tau => PDG_TAU,
            Flavor::Photon => PDG_PHOTON,
        }
    }

    pub fn is_lepton(&self) -> bool {
        !matches!(self, Flavor::Photon)
    }

    pub fn is_tau(&self) -> bool {
        matches!(self, Flavor::Tau)
    }
}

impl Display for Flavor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Electron => write!(f, "e"),
            Flavor::Muon => write!(f, "mu"),
            Flavor::Tau => write!(f, "tau"),
            Flavor::Photon => write!(f, "gamma"),
        }
    }
}

/// DeepTau working points, ordered from loosest to tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TauWorkingPoint {
    VVVLoose,
    VVLoose,
    VLoose,
    Loose,
    Medium,
    Tight,
    VTight,
    VVTight,
}

/// Muon track information needed by the bare muon preselection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuonTrackInfo {
    pub is_global: bool,
    pub is_tracker: bool,
    pub n_matches: u32,
    pub best_track_type: i32,
}

/// Tau identification bits. Each discriminant holds the tightest working
/// point the tau passes, `None` if it passes none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TauDiscriminants {
    pub decay_mode: i32,
    pub decay_mode_finding_new_dms: bool,
    pub vs_e: Option<TauWorkingPoint>,
    pub vs_mu: Option<TauWorkingPoint>,
    pub vs_jet: Option<TauWorkingPoint>,
}

impl TauDiscriminants {
    #[inline]
    fn passes(wp: Option<TauWorkingPoint>, required: TauWorkingPoint) -> bool {
        wp.map_or(false, |w| w >= required)
    }

    pub fn passes_vs_e(&self, required: TauWorkingPoint) -> bool {
        Self::passes(self.vs_e, required)
    }

    pub fn passes_vs_mu(&self, required: TauWorkingPoint) -> bool {
        Self::passes(self.vs_mu, required)
    }

    pub fn passes_vs_jet(&self, required: TauWorkingPoint) -> bool {
        Self::passes(self.vs_jet, required)
    }
}

/// Numeric and boolean decorations computed upstream (calibration, isolation
/// sums, identification, impact parameters, trigger matching).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decorations {
    /// identification decision of the flavour-specific ID
    pub id: bool,
    /// significance of the 3D impact parameter
    pub sip: f64,
    /// combined relative PF isolation, no FSR correction
    pub comb_rel_iso: f64,
    /// combined relative PF isolation after removing FSR photons
    pub comb_rel_iso_fsr_corr: Option<f64>,
    pub dxy: f64,
    pub dz: f64,
    /// matched to a trigger object of a single-lepton path
    pub trigger_matched: bool,
    pub muon: Option<MuonTrackInfo>,
    pub tau: Option<TauDiscriminants>,
}

impl Default for Decorations {
    fn default() -> Self {
        Decorations {
            id: false,
            sip: f64::INFINITY,
            comb_rel_iso: f64::INFINITY,
            comb_rel_iso_fsr_corr: None,
            dxy: 0.0,
            dz: 0.0,
            trigger_matched: false,
            muon: None,
            tau: None,
        }
    }
}

/// A reconstructed object as delivered by the calibration step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    pub flavor: Flavor,
    #[serde(flatten)]
    pub kin: PtEtaPhiM,
    pub charge: i32,
    #[serde(default)]
    pub deco: Decorations,
}

impl RawObject {
    pub fn new(flavor: Flavor, kin: PtEtaPhiM, charge: i32, deco: Decorations) -> Self {
        RawObject { flavor, kin, charge, deco }
    }
}

/// Flavour-specific goodness of a tau, one flag per partner flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TauGoodness {
    pub vs_mu: bool,
    pub vs_ele: bool,
    pub vs_tau: bool,
}

/// Named flags attached to each selected object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    #[serde(rename = "ID")]
    pub id: bool,
    #[serde(rename = "isSIP")]
    pub is_sip: bool,
    #[serde(rename = "isGood")]
    pub is_good: bool,
    #[serde(rename = "isIsoFSRUncorr")]
    pub is_iso_fsr_uncorr: bool,
    #[serde(rename = "passCombRelIsoPFFSRCorr")]
    pub pass_iso_fsr_corr: bool,
    pub tau: Option<TauGoodness>,
}

/// An object that survived the object selection, immutable from here on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedObject {
    /// position in the raw input collection
    pub source_index: usize,
    pub flavor: Flavor,
    pub p4: FourMomentum,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub charge: i32,
    /// impact-parameter significance, `None` for taus, photons and leptons
    /// delivered without one
    pub sip: Option<f64>,
    /// isolation used for the worst-isolation summaries (FSR corrected when
    /// available), `None` for taus and photons
    pub iso: Option<f64>,
    pub trigger_matched: bool,
    pub flags: ObjectFlags,
}

impl SelectedObject {
    /// Signed PDG id following the particle convention (negative lepton charge
    /// gives a positive id).
    pub fn pdg_id(&self) -> i32 {
        if self.charge < 0 {
            self.flavor.pdg_id()
        } else {
            -self.flavor.pdg_id()
        }
    }

    pub fn delta_r(&self, other: &SelectedObject) -> f64 {
        delta_r(self.eta, self.phi, other.eta, other.phi)
    }

    /// Tau goodness with respect to the flavour of the partner leg.
    /// Non-tau objects are always tau-good.
    pub fn is_good_tau_against(&self, partner: Flavor) -> bool {
        match (self.flavor, self.flags.tau) {
            (Flavor::Tau, Some(g)) => match partner {
                Flavor::Muon => g.vs_mu,
                Flavor::Electron => g.vs_ele,
                Flavor::Tau | Flavor::Photon => g.vs_tau,
            },
            (Flavor::Tau, None) => false,
            _ => true,
        }
    }

    /// Tight leg: ID, SIP and FSR-corrected isolation, plus tau goodness
    /// against the partner flavour.
    pub fn passes_tight(&self, partner: Flavor) -> bool {
        self.flags.is_good && self.is_good_tau_against(partner) && self.flags.pass_iso_fsr_corr
    }

    pub fn passes_sip(&self) -> bool {
        self.flavor.is_tau() || self.flags.is_sip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_point_order() {
        assert!(TauWorkingPoint::VVTight > TauWorkingPoint::Tight);
        assert!(TauWorkingPoint::VLoose < TauWorkingPoint::Medium);
        let d = TauDiscriminants { vs_mu: Some(TauWorkingPoint::Medium), ..Default::default() };
        assert!(d.passes_vs_mu(TauWorkingPoint::VLoose));
        assert!(!d.passes_vs_mu(TauWorkingPoint::Tight));
        assert!(!d.passes_vs_e(TauWorkingPoint::VVVLoose));
    }

    #[test]
    fn test_raw_object_from_json() {
        let json = r#"{"flavor":"muon","pt":25.0,"eta":0.5,"phi":1.0,"charge":-1,
                       "deco":{"id":true,"sip":1.5,"comb_rel_iso":0.1}}"#;
        let o: RawObject = serde_json::from_str(json).unwrap();
        assert_eq!(o.flavor, Flavor::Muon);
        assert_eq!(o.charge, -1);
        assert!(o.deco.id);
        assert!((o.kin.mass).abs() < 1e-12);
        assert!(o.deco.comb_rel_iso_fsr_corr.is_none());
    }

    #[test]
    fn test_non_tau_is_always_tau_good() {
        let o = SelectedObject {
            source_index: 0,
            flavor: Flavor::Electron,
            p4: FourMomentum::default(),
            pt: 10.0,
            eta: 0.0,
            phi: 0.0,
            charge: 1,
            sip: Some(1.0),
            iso: Some(0.0),
            trigger_matched: false,
            flags: ObjectFlags::default(),
        };
        assert!(o.is_good_tau_against(Flavor::Tau));
        assert_eq!(o.pdg_id(), -11);
    }
}
