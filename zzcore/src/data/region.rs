use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Selection regions a four-lepton candidate can be tagged with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// signal region
    SR,
    /// Z + same-sign LL
    CrZllSs,
    /// Z + opposite-sign LL, both LL legs failing the tight selection
    CrZllOs2P2F,
    /// Z + opposite-sign LL, exactly one LL leg failing the tight selection
    CrZllOs3P1F,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::SR, Region::CrZllSs, Region::CrZllOs2P2F, Region::CrZllOs3P1F];

    pub const CONTROL: [Region; 3] = [Region::CrZllSs, Region::CrZllOs2P2F, Region::CrZllOs3P1F];

    #[inline]
    pub fn bit(&self) -> u8 {
        1 << (*self as u8)
    }

    /// Name used for the region flags in the produced collections.
    pub fn name(&self) -> &'static str {
        match self {
            Region::SR => "SR",
            Region::CrZllSs => "CRZLLss",
            Region::CrZllOs2P2F => "CRZLLos_2P2F",
            Region::CrZllOs3P1F => "CRZLLos_3P1F",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Small bitset over `Region`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionMask(u8);

impl RegionMask {
    pub const EMPTY: RegionMask = RegionMask(0);

    #[inline]
    pub fn contains(&self, region: Region) -> bool {
        self.0 & region.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, region: Region, on: bool) {
        if on {
            self.0 |= region.bit();
        } else {
            self.0 &= !region.bit();
        }
    }

    pub fn with(mut self, region: Region) -> Self {
        self.set(region, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn intersection(&self, other: RegionMask) -> RegionMask {
        RegionMask(self.0 & other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        Region::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_set_and_clear() {
        let mut m = RegionMask::EMPTY;
        assert!(m.is_empty());
        m.set(Region::CrZllOs3P1F, true);
        m.set(Region::SR, true);
        assert!(m.contains(Region::SR));
        assert!(!m.contains(Region::CrZllSs));
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![Region::SR, Region::CrZllOs3P1F]);
        m.set(Region::SR, false);
        assert_eq!(m.bits(), Region::CrZllOs3P1F.bit());
    }

    #[test]
    fn test_intersection() {
        let a = RegionMask::EMPTY.with(Region::SR).with(Region::CrZllSs);
        let b = RegionMask::EMPTY.with(Region::CrZllSs);
        assert_eq!(a.intersection(b), b);
    }
}
