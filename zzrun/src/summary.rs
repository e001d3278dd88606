//! Region yields over a processed batch.

use std::collections::BTreeMap;

use serde::Serialize;

use zzcore::{EventResult, Region};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegionYields {
    pub events: usize,
    /// events whose best candidate carries the region flag, keyed by region name
    pub regions: BTreeMap<String, usize>,
    /// signal-region events passing `FullSel`
    pub full_sel: usize,
    pub zz_candidates: usize,
    pub zll_candidates: usize,
    pub zl_candidates: usize,
}

impl RegionYields {
    pub fn from_results(results: &[EventResult]) -> Self {
        let mut yields = RegionYields {
            events: results.len(),
            regions: Region::ALL.iter().map(|r| (r.name().to_string(), 0)).collect(),
            ..Default::default()
        };
        for res in results {
            let mask = res.region_mask();
            for region in mask.iter() {
                *yields.regions.entry(region.name().to_string()).or_insert(0) += 1;
            }
            if mask.contains(Region::SR) && res.best(Region::SR).is_some_and(|q| q.full_sel) {
                yields.full_sel += 1;
            }
            yields.zz_candidates += res.zz.len();
            yields.zll_candidates += res.zll.len();
            yields.zl_candidates += res.zl.len();
        }
        yields
    }

    pub fn count(&self, region: Region) -> usize {
        self.regions.get(region.name()).copied().unwrap_or(0)
    }

    pub fn log(&self) {
        log::info!("{} events processed", self.events);
        for (name, n) in &self.regions {
            log::info!("  {:<14} {}", name, n);
        }
        log::info!("  {:<14} {}", "FullSel", self.full_sel);
        log::info!(
            "  candidates: {} ZZ, {} ZLL, {} Zl",
            self.zz_candidates,
            self.zll_candidates,
            self.zl_candidates
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zzcore::{AnalysisConfig, Event, EventProcessor};

    #[test]
    fn test_empty_batch() {
        let y = RegionYields::from_results(&[]);
        assert_eq!(y.events, 0);
        assert_eq!(y.regions.len(), 4);
        assert_eq!(y.count(Region::SR), 0);
    }

    #[test]
    fn test_counts_events_without_candidates() {
        let proc = EventProcessor::new(AnalysisConfig::for_period("2018").unwrap()).unwrap();
        let results = proc.process_all(&[Event::default(), Event::default()]);
        let y = RegionYields::from_results(&results);
        assert_eq!(y.events, 2);
        assert_eq!(y.count(Region::CrZllSs), 0);
        assert_eq!(y.full_sel, 0);
        assert_eq!(y.zz_candidates, 0);
    }
}
