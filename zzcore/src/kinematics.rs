use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Kinematics as delivered by the reconstruction: transverse momentum,
/// pseudorapidity, azimuth and mass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PtEtaPhiM {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    #[serde(default)]
    pub mass: f64,
}

impl PtEtaPhiM {
    pub fn new(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        PtEtaPhiM { pt, eta, phi, mass }
    }
}

/// Cartesian Lorentz vector (px, py, pz, E) in GeV.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl FourMomentum {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        FourMomentum { px, py, pz, e }
    }

    /// Build a four-momentum from collider coordinates.
    ///
    /// # Arguments
    ///
    /// * `pt` - transverse momentum
    /// * `eta` - pseudorapidity
    /// * `phi` - azimuthal angle
    /// * `mass` - rest mass
    ///
    /// # Example
    ///
    /// ```rust
    /// # use zzcore::kinematics::FourMomentum;
    /// let p = FourMomentum::from_pt_eta_phi_m(40.0, 0.0, 0.0, 0.0);
    /// assert!((p.px - 40.0).abs() < 1e-12);
    /// assert!((p.e - 40.0).abs() < 1e-12);
    /// ```
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        let e = (p2 + mass * mass).sqrt();
        FourMomentum { px, py, pz, e }
    }

    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    pub fn p(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Squared invariant mass, may be slightly negative from rounding.
    pub fn mass2(&self) -> f64 {
        self.e * self.e - (self.px * self.px + self.py * self.py + self.pz * self.pz)
    }

    /// Invariant mass, clamped at zero for space-like rounding residues.
    pub fn mass(&self) -> f64 {
        self.mass2().max(0.0).sqrt()
    }

    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 {
            0.0
        } else {
            self.py.atan2(self.px)
        }
    }

    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return if self.pz >= 0.0 { f64::INFINITY } else { f64::NEG_INFINITY };
        }
        (self.pz / pt).asinh()
    }
}

impl From<PtEtaPhiM> for FourMomentum {
    fn from(k: PtEtaPhiM) -> Self {
        FourMomentum::from_pt_eta_phi_m(k.pt, k.eta, k.phi, k.mass)
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, other: FourMomentum) -> FourMomentum {
        FourMomentum {
            px: self.px + other.px,
            py: self.py + other.py,
            pz: self.pz + other.pz,
            e: self.e + other.e,
        }
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, other: FourMomentum) {
        self.px += other.px;
        self.py += other.py;
        self.pz += other.pz;
        self.e += other.e;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + *p)
    }
}

impl Display for FourMomentum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(px={:.3}, py={:.3}, pz={:.3}, E={:.3})", self.px, self.py, self.pz, self.e)
    }
}

/// Azimuthal difference wrapped into (-pi, pi].
#[inline]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let mut d = phi1 - phi2;
    while d > PI {
        d -= 2.0 * PI;
    }
    while d <= -PI {
        d += 2.0 * PI;
    }
    d
}

/// Angular separation in the (eta, phi) plane.
#[inline]
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    (deta * deta + dphi * dphi).sqrt()
}
