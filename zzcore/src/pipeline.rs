//! Per-event processing chain.
//!
//! objects -> Z / LL pairs -> ZZ (signal region) and Z + LL (control
//! regions) -> best candidate per region, plus the Z + l candidates.
//! Each stage only reads the finished output of the previous one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combine::pairs::{PairCombiner, PairMode};
use crate::combine::quads::{QuadCombiner, ZRoles};
use crate::combine::trilepton::{TrileptonCombiner, ZlCandidate};
use crate::config::{AnalysisConfig, RawAnalysisConfig};
use crate::data::event::{Event, Met};
use crate::data::object::SelectedObject;
use crate::data::pair::Pair;
use crate::data::quad::QuadCandidate;
use crate::data::region::{Region, RegionMask};
use crate::error::Result;
use crate::region::arbitration::BestCandidateArbitrator;
use crate::region::control::ControlRegionClassifier;
use crate::region::setup::record_cut_flags;
use crate::select::jets::{JetSelector, SelectedJet};
use crate::select::objects::ObjectSelector;

/// Everything produced for one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub run: u32,
    pub lumi: u32,
    pub event: u64,
    pub objects: Vec<SelectedObject>,
    pub jets: Vec<SelectedJet>,
    pub z_pairs: Vec<Pair>,
    pub ll_pairs: Vec<Pair>,
    /// ZZ candidates, signal region
    pub zz: Vec<QuadCandidate>,
    /// Z + LL candidates, control regions
    pub zll: Vec<QuadCandidate>,
    pub zl: Vec<ZlCandidate>,
    /// lepton 2-combinations enumerated before any pair filter
    pub raw_pair_combinations: usize,
    pub met: Option<Met>,
}

impl EventResult {
    /// Candidate collection a region is arbitrated on.
    pub fn candidates(&self, region: Region) -> &[QuadCandidate] {
        match region {
            Region::SR => &self.zz,
            _ => &self.zll,
        }
    }

    pub fn best_index(&self, region: Region) -> Option<usize> {
        self.candidates(region).iter().position(|q| q.is_best(region))
    }

    pub fn best(&self, region: Region) -> Option<&QuadCandidate> {
        self.candidates(region).iter().find(|q| q.is_best(region))
    }

    /// Regions whose best candidate also carries the region flag.
    pub fn region_mask(&self) -> RegionMask {
        let mut mask = RegionMask::EMPTY;
        for region in Region::ALL {
            mask.set(region, self.best(region).is_some_and(|q| q.in_region(region)));
        }
        mask
    }
}

#[derive(Clone, Debug)]
pub struct EventProcessor {
    config: AnalysisConfig,
    objects: ObjectSelector,
    jets: JetSelector,
    pairs: PairCombiner,
    zz: QuadCombiner,
    zll: QuadCombiner,
    zl: TrileptonCombiner,
    control: ControlRegionClassifier,
    arbitrator: BestCandidateArbitrator,
}

impl EventProcessor {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let c = &config.constants;
        c.validate(&config.run_period)?;

        Ok(EventProcessor {
            objects: ObjectSelector::new(config.object_cuts.clone(), c),
            jets: JetSelector::new(config.jet_cuts.clone()),
            pairs: PairCombiner::new(c, config.keep_loose_combinations, config.check_charge),
            zz: QuadCombiner::new(c.z_mass, c.ghost_dr, config.check_charge, ZRoles::ByMass),
            // Z + LL: Z1 stays the Z pair, LL pairs keep any charge
            zll: QuadCombiner::new(c.z_mass, c.ghost_dr, false, ZRoles::Fixed),
            zl: TrileptonCombiner::new(c.ghost_dr),
            control: ControlRegionClassifier::new(config.setup, c),
            arbitrator: BestCandidateArbitrator::new(config.comparator, c.z_mass),
            config,
        })
    }

    pub fn from_raw(raw: RawAnalysisConfig) -> Result<Self> {
        Self::new(AnalysisConfig::resolve(raw)?)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full chain on one event. Pure: the same event always gives
    /// the same result.
    pub fn process(&self, event: &Event) -> EventResult {
        let objects = self.objects.select(&event.objects);
        let jets = self.jets.select(&event.jets, &objects);

        let z = self.pairs.combine(&objects, &event.trigger, PairMode::Z);
        let ll = self.pairs.combine(&objects, &event.trigger, PairMode::LooseLL);

        let mut zz = self.zz.combine_self(&objects, &z.pairs);
        for q in zz.iter_mut() {
            self.tag_signal_region(q);
        }
        self.arbitrator.mark_best(&mut zz, Region::SR);

        let mut zll = self.zll.combine_cross(&objects, &z.pairs, &ll.pairs);
        for q in zll.iter_mut() {
            record_cut_flags(q, &self.config.constants);
        }
        self.control.classify_all(&mut zll);
        for region in Region::CONTROL {
            self.arbitrator.mark_best(&mut zll, region);
        }

        let zl = self.zl.combine(&objects, &z.pairs);

        log::debug!(
            "event {}:{}:{}: {} objects, {} Z, {} LL, {} ZZ, {} ZLL, {} Zl",
            event.run,
            event.lumi,
            event.event,
            objects.len(),
            z.pairs.len(),
            ll.pairs.len(),
            zz.len(),
            zll.len(),
            zl.len()
        );

        EventResult {
            run: event.run,
            lumi: event.lumi,
            event: event.event,
            objects,
            jets,
            z_pairs: z.pairs,
            ll_pairs: ll.pairs,
            zz,
            zll,
            zl,
            raw_pair_combinations: z.raw_combinations,
            met: event.met.clone(),
        }
    }

    /// Process a batch of events in parallel; output order follows input order.
    pub fn process_all(&self, events: &[Event]) -> Vec<EventResult> {
        let results: Vec<EventResult> = events.par_iter().map(|e| self.process(e)).collect();
        log::info!("processed {} events", results.len());
        results
    }

    fn tag_signal_region(&self, q: &mut QuadCandidate) {
        let setup = self.config.setup;
        let c = &self.config.constants;
        record_cut_flags(q, c);
        let among = setup.best_cand_among(q, c);
        let sr = setup.signal_region(q, c);
        let full_sel = setup.full_sel(q, c);
        q.eligible.set(Region::SR, among);
        q.passes.set(Region::SR, sr);
        q.full_sel = full_sel;
    }
}
