//! Job configuration.
//!
//! `RawAnalysisConfig` mirrors the job file and is string-typed where the
//! analysts pick a strategy by name. `AnalysisConfig::resolve` validates it
//! once, before any event is processed, and is the only place where a
//! configuration error can be raised.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{ELE_ISO_CUT, GHOST_DELTA_R, MU_ISO_CUT, Z1_WINDOW_HIGH, Z1_WINDOW_LOW, Z_MASS_NOMINAL};
use crate::data::object::Flavor;
use crate::error::{Error, Result};
use crate::region::arbitration::{BestCandComparator, SecondaryKey};
use crate::region::setup::SelectionSetup;
use crate::select::jets::JetCuts;
use crate::select::objects::ObjectCuts;

/// Run-period dependent constants. The isolation thresholds live here and
/// nowhere else; every selection step reads them from this record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunPeriodConstants {
    pub ele_iso_cut: f64,
    pub mu_iso_cut: f64,
    pub z_mass: f64,
    pub z1_window: (f64, f64),
    pub ghost_dr: f64,
    pub single_ele_paths: Vec<String>,
    pub single_mu_paths: Vec<String>,
}

impl Default for RunPeriodConstants {
    fn default() -> Self {
        Self {
            ele_iso_cut: ELE_ISO_CUT,
            mu_iso_cut: MU_ISO_CUT,
            z_mass: Z_MASS_NOMINAL,
            z1_window: (Z1_WINDOW_LOW, Z1_WINDOW_HIGH),
            ghost_dr: GHOST_DELTA_R,
            single_ele_paths: Vec::new(),
            single_mu_paths: Vec::new(),
        }
    }
}

impl RunPeriodConstants {
    fn with_paths(ele: &[&str], mu: &[&str]) -> Self {
        Self {
            single_ele_paths: ele.iter().map(|s| s.to_string()).collect(),
            single_mu_paths: mu.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Check that every constant is usable.
    pub fn validate(&self, period: &str) -> Result<()> {
        let invalid = |name: &'static str, value: f64| Error::InvalidConstant {
            period: period.to_string(),
            name,
            value,
        };
        // isolation cuts may be huge (disabled) but must be positive numbers
        for (name, v) in [("ele_iso_cut", self.ele_iso_cut), ("mu_iso_cut", self.mu_iso_cut)] {
            if v.is_nan() || v <= 0.0 {
                return Err(invalid(name, v));
            }
        }
        if !self.z_mass.is_finite() || self.z_mass <= 0.0 {
            return Err(invalid("z_mass", self.z_mass));
        }
        let (lo, hi) = self.z1_window;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(invalid("z1_window", lo));
        }
        if !self.ghost_dr.is_finite() || self.ghost_dr < 0.0 {
            return Err(invalid("ghost_dr", self.ghost_dr));
        }
        Ok(())
    }

    /// Inclusive Z1 preselection mass window.
    #[inline]
    pub fn in_z1_window(&self, mass: f64) -> bool {
        mass >= self.z1_window.0 && mass <= self.z1_window.1
    }

    /// Isolation threshold for a lepton flavour, looked up in one place.
    #[inline]
    pub fn iso_cut(&self, flavor: Flavor) -> Option<f64> {
        match flavor {
            Flavor::Electron => Some(self.ele_iso_cut),
            Flavor::Muon => Some(self.mu_iso_cut),
            Flavor::Tau | Flavor::Photon => None,
        }
    }
}

/// Built-in run periods. Physics constants are shared, trigger paths differ.
pub fn builtin_run_periods() -> BTreeMap<String, RunPeriodConstants> {
    let mut periods = BTreeMap::new();
    periods.insert(
        "2016".to_string(),
        RunPeriodConstants::with_paths(&["HLT_Ele25_eta2p1_WPTight_Gsf"], &["HLT_IsoMu24", "HLT_IsoTkMu24"]),
    );
    periods.insert(
        "2017".to_string(),
        RunPeriodConstants::with_paths(&["HLT_Ele35_WPTight_Gsf"], &["HLT_IsoMu27"]),
    );
    periods.insert(
        "2018".to_string(),
        RunPeriodConstants::with_paths(&["HLT_Ele32_WPTight_Gsf"], &["HLT_IsoMu24"]),
    );
    periods
}

fn default_setup() -> String {
    "allCutsAtOncePlusSmart".to_string()
}

fn default_comparator() -> String {
    "byBestZ1bestZ2".to_string()
}

fn default_secondary() -> String {
    "z2SumPt".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration as read from the job file. Unknown keys are rejected so a
/// misspelled strategy name never falls back to the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAnalysisConfig {
    pub run_period: String,
    #[serde(default = "default_setup")]
    pub selection_setup: String,
    #[serde(default = "default_comparator")]
    pub best_cand_comparator: String,
    #[serde(default = "default_secondary")]
    pub secondary_key: String,
    /// propagate combinations of loose leptons (debugging only)
    #[serde(default)]
    pub keep_loose_combinations: bool,
    #[serde(default = "default_true")]
    pub check_charge: bool,
    /// extra or overriding run periods, merged over the built-in ones
    #[serde(default)]
    pub run_periods: BTreeMap<String, RunPeriodConstants>,
    #[serde(default)]
    pub object_cuts: ObjectCuts,
    #[serde(default)]
    pub jet_cuts: JetCuts,
}

impl RawAnalysisConfig {
    /// Configuration with default strategies for a built-in run period.
    pub fn for_period(period: &str) -> Self {
        RawAnalysisConfig {
            run_period: period.to_string(),
            selection_setup: default_setup(),
            best_cand_comparator: default_comparator(),
            secondary_key: default_secondary(),
            keep_loose_combinations: false,
            check_charge: true,
            run_periods: BTreeMap::new(),
            object_cuts: ObjectCuts::default(),
            jet_cuts: JetCuts::default(),
        }
    }
}

/// Validated, strongly-typed configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub run_period: String,
    pub constants: RunPeriodConstants,
    pub setup: SelectionSetup,
    pub comparator: BestCandComparator,
    pub keep_loose_combinations: bool,
    pub check_charge: bool,
    pub object_cuts: ObjectCuts,
    pub jet_cuts: JetCuts,
}

impl AnalysisConfig {
    /// Resolve names to strategies and look up the run-period constants.
    pub fn resolve(raw: RawAnalysisConfig) -> Result<Self> {
        let setup: SelectionSetup = raw.selection_setup.parse()?;
        let secondary: SecondaryKey = raw.secondary_key.parse()?;
        let comparator = BestCandComparator::from_name(&raw.best_cand_comparator, secondary)?;

        let mut periods = builtin_run_periods();
        periods.extend(raw.run_periods);
        let constants = periods
            .remove(&raw.run_period)
            .ok_or_else(|| Error::MissingRunPeriod(raw.run_period.clone()))?;
        constants.validate(&raw.run_period)?;

        if raw.keep_loose_combinations {
            log::warn!("keep_loose_combinations is set: loose lepton pairs are propagated (debug mode)");
        }
        if !raw.check_charge {
            log::warn!("charge check disabled for Z and ZZ combinatorics");
        }
        log::info!(
            "configured run period {} with setup {} and comparator {}",
            raw.run_period,
            setup,
            comparator
        );

        Ok(AnalysisConfig {
            run_period: raw.run_period,
            constants,
            setup,
            comparator,
            keep_loose_combinations: raw.keep_loose_combinations,
            check_charge: raw.check_charge,
            object_cuts: raw.object_cuts,
            jet_cuts: raw.jet_cuts,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawAnalysisConfig = serde_json::from_str(json)?;
        Self::resolve(raw)
    }

    /// Default configuration for a built-in run period.
    pub fn for_period(period: &str) -> Result<Self> {
        Self::resolve(RawAnalysisConfig::for_period(period))
    }
}
