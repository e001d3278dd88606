use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::object::RawObject;
use crate::kinematics::PtEtaPhiM;

/// Trigger decisions keyed by HLT path name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerBits {
    paths: BTreeMap<String, bool>,
}

impl TriggerBits {
    pub fn new() -> Self {
        TriggerBits { paths: BTreeMap::new() }
    }

    pub fn with(mut self, path: &str, fired: bool) -> Self {
        self.paths.insert(path.to_string(), fired);
        self
    }

    /// Whether the named path fired; unknown paths did not.
    pub fn fired(&self, path: &str) -> bool {
        self.paths.get(path).copied().unwrap_or(false)
    }

    /// Whether any of the given paths fired.
    pub fn any_fired<S: AsRef<str>>(&self, paths: &[S]) -> bool {
        paths.iter().any(|p| self.fired(p.as_ref()))
    }
}

/// Missing transverse energy, central value plus systematic variations
/// (TES, EES, MES, JES, JER up/down). Carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Met {
    pub px: f64,
    pub py: f64,
    /// covariance (xx, xy, yy)
    #[serde(default)]
    pub cov: [f64; 3],
    #[serde(default)]
    pub significance: Option<f64>,
    /// shift name -> (px, py)
    #[serde(default)]
    pub shifts: BTreeMap<String, (f64, f64)>,
}

impl Met {
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }
}

/// A jet as delivered by the jet energy correction step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawJet {
    #[serde(flatten)]
    pub kin: PtEtaPhiM,
    #[serde(default)]
    pub jet_id: bool,
    #[serde(default)]
    pub pu_jet_id: bool,
    #[serde(default)]
    pub btag: f64,
}

/// One recorded collision: the per-event, read-only input of the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub run: u32,
    #[serde(default)]
    pub lumi: u32,
    #[serde(default)]
    pub event: u64,
    pub objects: Vec<RawObject>,
    #[serde(default)]
    pub jets: Vec<RawJet>,
    #[serde(default)]
    pub trigger: TriggerBits,
    #[serde(default)]
    pub met: Option<Met>,
}
