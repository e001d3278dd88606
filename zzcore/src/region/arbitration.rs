//! Best-candidate arbitration.
//!
//! Among the candidates eligible for a region exactly one (or none, if the
//! set is empty) is flagged as best. The ordering is a named comparator;
//! full ties go to the candidate built first.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use ordered_float::OrderedFloat;

use crate::constants::SAME_Z1_MASS_TOLERANCE;
use crate::data::quad::QuadCandidate;
use crate::data::region::Region;
use crate::error::{Error, Result};

/// Key deciding between candidates sharing the same Z1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecondaryKey {
    /// larger scalar sum of the Z2 leg pt wins
    #[default]
    Z2SumPt,
    /// Z2 mass closer to the nominal Z mass wins
    Z2MassCloseness,
}

impl SecondaryKey {
    pub fn name(&self) -> &'static str {
        match self {
            SecondaryKey::Z2SumPt => "z2SumPt",
            SecondaryKey::Z2MassCloseness => "z2MassCloseness",
        }
    }
}

impl FromStr for SecondaryKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "z2SumPt" => Ok(SecondaryKey::Z2SumPt),
            "z2MassCloseness" => Ok(SecondaryKey::Z2MassCloseness),
            _ => Err(Error::UnknownSecondaryKey(s.to_string())),
        }
    }
}

impl Display for SecondaryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named best-candidate ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BestCandComparator {
    /// Z1 closest to the nominal mass, then the secondary key on Z2
    ByBestZ1BestZ2 { secondary: SecondaryKey },
}

impl BestCandComparator {
    pub fn from_name(name: &str, secondary: SecondaryKey) -> Result<Self> {
        match name {
            "byBestZ1bestZ2" => Ok(BestCandComparator::ByBestZ1BestZ2 { secondary }),
            _ => Err(Error::UnknownComparator(name.to_string())),
        }
    }

    /// `Less` means `a` is the better candidate.
    pub fn compare(&self, a: &QuadCandidate, b: &QuadCandidate, z_mass: f64) -> Ordering {
        match self {
            BestCandComparator::ByBestZ1BestZ2 { secondary } => {
                if (a.z1.mass - b.z1.mass).abs() < SAME_Z1_MASS_TOLERANCE {
                    match secondary {
                        SecondaryKey::Z2SumPt => OrderedFloat(b.z2.sum_pt).cmp(&OrderedFloat(a.z2.sum_pt)),
                        SecondaryKey::Z2MassCloseness => {
                            OrderedFloat((a.z2.mass - z_mass).abs()).cmp(&OrderedFloat((b.z2.mass - z_mass).abs()))
                        }
                    }
                } else {
                    OrderedFloat((a.z1.mass - z_mass).abs()).cmp(&OrderedFloat((b.z1.mass - z_mass).abs()))
                }
            }
        }
    }
}

impl Display for BestCandComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BestCandComparator::ByBestZ1BestZ2 { secondary } => write!(f, "byBestZ1bestZ2({})", secondary),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BestCandidateArbitrator {
    comparator: BestCandComparator,
    z_mass: f64,
}

impl BestCandidateArbitrator {
    pub fn new(comparator: BestCandComparator, z_mass: f64) -> Self {
        BestCandidateArbitrator { comparator, z_mass }
    }

    pub fn comparator(&self) -> BestCandComparator {
        self.comparator
    }

    /// Index of the best candidate among those accepted by `eligible`.
    pub fn select_best<F>(&self, candidates: &[QuadCandidate], eligible: F) -> Option<usize>
    where
        F: Fn(&QuadCandidate) -> bool,
    {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, q)| eligible(q))
            .min_by(|(ia, a), (ib, b)| self.comparator.compare(a, b, self.z_mass).then(ia.cmp(ib)))
            .map(|(i, _)| i)
    }

    /// Set the best bit of `region` on at most one candidate, choosing among
    /// the candidates whose eligible bit for that region is set.
    pub fn mark_best(&self, candidates: &mut [QuadCandidate], region: Region) -> Option<usize> {
        for q in candidates.iter_mut() {
            q.best.set(region, false);
        }
        let best = self.select_best(candidates, |q| q.eligible.contains(region));
        if let Some(i) = best {
            candidates[i].best.set(region, true);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::fixtures::quad;

    const Z: f64 = 91.1876;

    fn arbitrator(secondary: SecondaryKey) -> BestCandidateArbitrator {
        BestCandidateArbitrator::new(BestCandComparator::ByBestZ1BestZ2 { secondary }, Z)
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            BestCandComparator::from_name("byBestZ1bestZ2", SecondaryKey::default()).unwrap(),
            BestCandComparator::ByBestZ1BestZ2 { secondary: SecondaryKey::Z2SumPt }
        );
        assert!(matches!(
            BestCandComparator::from_name("byBestPsig", SecondaryKey::default()),
            Err(Error::UnknownComparator(_))
        ));
        assert!(matches!("z2Pt".parse::<SecondaryKey>(), Err(Error::UnknownSecondaryKey(_))));
        assert_eq!("z2MassCloseness".parse::<SecondaryKey>().unwrap(), SecondaryKey::Z2MassCloseness);
    }

    #[test]
    fn test_z1_closeness_wins() {
        let arb = arbitrator(SecondaryKey::Z2SumPt);
        let mut far = quad(88.0, 30.0);
        far.z2.sum_pt = 500.0;
        let near = quad(91.5, 30.0);
        assert_eq!(arb.select_best(&[far, near], |_| true), Some(1));
    }

    #[test]
    fn test_secondary_keys_on_same_z1() {
        let mut a = quad(91.0, 20.0);
        a.z2.sum_pt = 50.0;
        let mut b = quad(91.0 + 5e-5, 60.0);
        b.z2.sum_pt = 40.0;
        let cands = [a, b];
        assert_eq!(arbitrator(SecondaryKey::Z2SumPt).select_best(&cands, |_| true), Some(0));
        assert_eq!(arbitrator(SecondaryKey::Z2MassCloseness).select_best(&cands, |_| true), Some(1));
    }

    #[test]
    fn test_full_tie_goes_to_first() {
        let cands = [quad(91.0, 30.0), quad(91.0, 30.0), quad(91.0, 30.0)];
        assert_eq!(arbitrator(SecondaryKey::Z2SumPt).select_best(&cands, |_| true), Some(0));
        assert_eq!(arbitrator(SecondaryKey::Z2SumPt).select_best(&cands, |_| false), None);
    }

    #[test]
    fn test_mark_best_at_most_one_per_region() {
        let arb = arbitrator(SecondaryKey::Z2SumPt);
        let mut cands: Vec<QuadCandidate> = [90.0, 91.2, 92.0, 85.0].iter().map(|&m| quad(m, 30.0)).collect();
        for (i, q) in cands.iter_mut().enumerate() {
            q.eligible.set(Region::SR, i != 1);
            q.eligible.set(Region::CrZllSs, i == 3);
        }
        assert_eq!(arb.mark_best(&mut cands, Region::SR), Some(2));
        assert_eq!(arb.mark_best(&mut cands, Region::CrZllSs), Some(3));
        assert_eq!(arb.mark_best(&mut cands, Region::CrZllOs2P2F), None);
        for region in Region::ALL {
            assert!(cands.iter().filter(|q| q.is_best(region)).count() <= 1);
        }
        // re-running is stable
        assert_eq!(arb.mark_best(&mut cands, Region::SR), Some(2));
        assert_eq!(cands.iter().filter(|q| q.is_best(Region::SR)).count(), 1);
    }
}
