use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::data::object::{Flavor, SelectedObject};
use crate::kinematics::FourMomentum;

/// Flavour content of a two-leg candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairFlavor {
    EE,
    MuMu,
    ETau,
    MuTau,
    TauTau,
    EMu,
    /// anything involving a non-lepton
    Other,
}

impl PairFlavor {
    pub fn of(a: Flavor, b: Flavor) -> PairFlavor {
        use Flavor::*;
        match (a, b) {
            (Electron, Electron) => PairFlavor::EE,
            (Muon, Muon) => PairFlavor::MuMu,
            (Electron, Tau) | (Tau, Electron) => PairFlavor::ETau,
            (Muon, Tau) | (Tau, Muon) => PairFlavor::MuTau,
            (Tau, Tau) => PairFlavor::TauTau,
            (Electron, Muon) | (Muon, Electron) => PairFlavor::EMu,
            _ => PairFlavor::Other,
        }
    }

    pub fn has_tau(&self) -> bool {
        matches!(self, PairFlavor::ETau | PairFlavor::MuTau | PairFlavor::TauTau)
    }

    /// Same flavour, or a tau involved (the pairing rule for Z candidates).
    pub fn same_flavor_or_tau(&self) -> bool {
        matches!(self, PairFlavor::EE | PairFlavor::MuMu) || self.has_tau()
    }

    pub fn is_light_same_flavor(&self) -> bool {
        matches!(self, PairFlavor::EE | PairFlavor::MuMu)
    }
}

impl Display for PairFlavor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            PairFlavor::EE => "ee",
            PairFlavor::MuMu => "mumu",
            PairFlavor::ETau => "etau",
            PairFlavor::MuTau => "mutau",
            PairFlavor::TauTau => "tautau",
            PairFlavor::EMu => "emu",
            PairFlavor::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// A two-leg (Z) candidate. Legs are indices into the event's object pool,
/// so every pair and quad built from the same lepton sees the same object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub legs: [usize; 2],
    pub p4: FourMomentum,
    pub mass: f64,
    pub flavor: PairFlavor,
    /// product of the leg charges
    pub charge_product: i32,
    pub sum_pt: f64,
    /// both legs `isGood` (ID and SIP, no isolation)
    #[serde(rename = "GoodLeptons")]
    pub good_leptons: bool,
    /// both legs `isGood` and FSR-corrected isolation
    #[serde(rename = "GoodIsoLeptons")]
    pub good_iso_leptons: bool,
    /// tau legs good with respect to their partner flavour
    #[serde(rename = "isGoodTau")]
    pub good_taus: bool,
    /// both legs pass the FSR-corrected isolation
    pub iso_leptons: bool,
    /// good leptons and mass inside the Z1 window
    #[serde(rename = "Z1Presel")]
    pub z1_presel: bool,
    #[serde(rename = "eleHLTMatch")]
    pub ele_hlt_match: bool,
    #[serde(rename = "muHLTMatch")]
    pub mu_hlt_match: bool,
    /// worst isolation over the electron legs, `None` without electrons
    #[serde(rename = "worstEleIso")]
    pub worst_ele_iso: Option<f64>,
    /// worst isolation over the muon legs, `None` without muons
    #[serde(rename = "worstMuIso")]
    pub worst_mu_iso: Option<f64>,
    /// closest to the nominal Z mass among the pairs passing the best-Z preselection
    #[serde(rename = "isBestZ")]
    pub is_best_z: bool,
}

impl Pair {
    /// Compute the kinematic and flag content of the pair `(i, j)` of the pool.
    /// `is_best_z` is left unset; it depends on the other pairs of the event.
    pub fn build(
        pool: &[SelectedObject],
        i: usize,
        j: usize,
        ele_trigger_fired: bool,
        mu_trigger_fired: bool,
        in_z1_window: impl Fn(f64) -> bool,
    ) -> Pair {
        let (a, b) = (&pool[i], &pool[j]);
        let p4 = a.p4 + b.p4;
        let mass = p4.mass();
        let flavor = PairFlavor::of(a.flavor, b.flavor);
        let good_leptons = a.flags.is_good && b.flags.is_good;
        let iso_leptons = a.flags.pass_iso_fsr_corr && b.flags.pass_iso_fsr_corr;
        let good_taus = a.is_good_tau_against(b.flavor) && b.is_good_tau_against(a.flavor);
        let any_matched = a.trigger_matched || b.trigger_matched;

        let worst = |f: Flavor| {
            [a, b]
                .iter()
                .filter(|o| o.flavor == f)
                // a lepton without an isolation value is never isolated
                .map(|o| o.iso.unwrap_or(f64::MAX))
                .reduce(f64::max)
        };

        Pair {
            legs: [i, j],
            p4,
            mass,
            flavor,
            charge_product: a.charge * b.charge,
            sum_pt: a.pt + b.pt,
            good_leptons,
            good_iso_leptons: good_leptons && iso_leptons,
            good_taus,
            iso_leptons,
            z1_presel: good_leptons && in_z1_window(mass),
            ele_hlt_match: flavor == PairFlavor::EE && ele_trigger_fired && any_matched,
            mu_hlt_match: flavor == PairFlavor::MuMu && mu_trigger_fired && any_matched,
            worst_ele_iso: worst(Flavor::Electron),
            worst_mu_iso: worst(Flavor::Muon),
            is_best_z: false,
        }
    }

    #[inline]
    pub fn is_os(&self) -> bool {
        self.charge_product < 0
    }

    #[inline]
    pub fn is_ss(&self) -> bool {
        self.charge_product > 0
    }

    /// Opposite-sign same-flavour light leptons (`OSSF`).
    #[inline]
    pub fn is_ossf(&self) -> bool {
        self.is_os() && self.flavor.is_light_same_flavor()
    }

    #[inline]
    pub fn has_tau(&self) -> bool {
        self.flavor.has_tau()
    }

    /// Flavour-matched trigger match: ee pairs need the electron path,
    /// mumu pairs the muon path.
    #[inline]
    pub fn trigger_match(&self) -> bool {
        (self.flavor == PairFlavor::EE && self.ele_hlt_match) || (self.flavor == PairFlavor::MuMu && self.mu_hlt_match)
    }

    /// Worst isolations below the per-flavour cuts. A pair without legs of a
    /// flavour passes that flavour's cut.
    #[inline]
    pub fn worst_iso_below(&self, ele_cut: f64, mu_cut: f64) -> bool {
        self.worst_ele_iso.is_none_or(|iso| iso < ele_cut) && self.worst_mu_iso.is_none_or(|iso| iso < mu_cut)
    }

    pub fn shares_leg(&self, other: &Pair) -> bool {
        self.legs.iter().any(|l| other.legs.contains(l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::object::{ObjectFlags, TauGoodness};

    fn lepton(flavor: Flavor, phi: f64, charge: i32, iso: Option<f64>) -> SelectedObject {
        SelectedObject {
            source_index: 0,
            flavor,
            p4: FourMomentum::from_pt_eta_phi_m(40.0, 0.0, phi, 0.0),
            pt: 40.0,
            eta: 0.0,
            phi,
            charge,
            sip: iso.map(|_| 1.0),
            iso,
            trigger_matched: true,
            flags: ObjectFlags {
                id: true,
                is_sip: true,
                is_good: true,
                is_iso_fsr_uncorr: true,
                pass_iso_fsr_corr: true,
                tau: None,
            },
        }
    }

    /// A tau good against muons and taus, not against electrons.
    fn tau(phi: f64, charge: i32, vs_tau: bool) -> SelectedObject {
        let mut t = lepton(Flavor::Tau, phi, charge, None);
        t.flags.tau = Some(TauGoodness { vs_mu: true, vs_ele: false, vs_tau });
        t
    }

    fn build(pool: &[SelectedObject]) -> Pair {
        Pair::build(pool, 0, 1, true, true, |m| (81.1876..=101.1876).contains(&m))
    }

    #[test]
    fn test_tau_goodness_follows_partner_flavor() {
        let mu_tau = build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.1)), tau(3.0, -1, true)]);
        assert_eq!(mu_tau.flavor, PairFlavor::MuTau);
        assert!(mu_tau.good_taus);

        let e_tau = build(&[tau(0.0, 1, true), lepton(Flavor::Electron, 3.0, -1, Some(0.1))]);
        assert_eq!(e_tau.flavor, PairFlavor::ETau);
        assert!(!e_tau.good_taus);

        let tau_tau = build(&[tau(0.0, 1, true), tau(3.0, -1, true)]);
        assert_eq!(tau_tau.flavor, PairFlavor::TauTau);
        assert!(tau_tau.good_taus);
        let tau_tau = build(&[tau(0.0, 1, true), tau(3.0, -1, false)]);
        assert!(!tau_tau.good_taus);

        // a tau without goodness flags is never good
        let mut bare = tau(3.0, -1, true);
        bare.flags.tau = None;
        assert!(!build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.1)), bare]).good_taus);

        let mu_mu = build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.1)), lepton(Flavor::Muon, 3.0, -1, Some(0.1))]);
        assert!(mu_mu.good_taus);
    }

    #[test]
    fn test_worst_isolation_per_flavor() {
        let mu_tau = build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.3)), tau(3.0, -1, true)]);
        assert_eq!(mu_tau.worst_mu_iso, Some(0.3));
        assert_eq!(mu_tau.worst_ele_iso, None);
        assert!(mu_tau.worst_iso_below(99999.0, 0.35));
        assert!(!mu_tau.worst_iso_below(99999.0, 0.25));

        let mu_mu = build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.3)), lepton(Flavor::Muon, 3.0, -1, Some(0.05))]);
        assert_eq!(mu_mu.worst_mu_iso, Some(0.3));

        // missing isolation fails any cut
        let no_iso = build(&[lepton(Flavor::Muon, 0.0, 1, None), lepton(Flavor::Muon, 3.0, -1, Some(0.05))]);
        assert!(!no_iso.worst_iso_below(99999.0, 1e9));
    }

    #[test]
    fn test_json_round_trip() {
        let mu_tau = build(&[lepton(Flavor::Muon, 0.0, 1, Some(0.3)), tau(3.0, -1, true)]);
        let json = serde_json::to_string(&mu_tau).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["worstEleIso"].is_null());
        assert_eq!(value["worstMuIso"], serde_json::json!(0.3));
        assert_eq!(value["isGoodTau"], serde_json::json!(true));
        assert!(value.get("Z1Presel").is_some() && value.get("isBestZ").is_some());
        let back: Pair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mu_tau);
    }

    #[test]
    fn test_pair_flavor_classification() {
        assert_eq!(PairFlavor::of(Flavor::Muon, Flavor::Muon), PairFlavor::MuMu);
        assert_eq!(PairFlavor::of(Flavor::Tau, Flavor::Electron), PairFlavor::ETau);
        assert_eq!(PairFlavor::of(Flavor::Muon, Flavor::Electron), PairFlavor::EMu);
        assert!(PairFlavor::MuTau.same_flavor_or_tau());
        assert!(!PairFlavor::EMu.same_flavor_or_tau());
        assert!(!PairFlavor::TauTau.is_light_same_flavor());
        assert_eq!(PairFlavor::of(Flavor::Photon, Flavor::Muon), PairFlavor::Other);
    }
}
