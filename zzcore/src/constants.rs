// Purpose: To store constants that are used in the candidate building
pub const Z_MASS_NOMINAL: f64 = 91.1876; // GeV

// Z1 preselection window, inclusive on both ends
pub const Z1_WINDOW_LOW: f64 = 81.1876; // GeV
pub const Z1_WINDOW_HIGH: f64 = 101.1876; // GeV

// Isolation cuts (combined relative PF isolation)
pub const ELE_ISO_CUT: f64 = 99999.0; // effectively disabled
pub const MU_ISO_CUT: f64 = 0.35;

// Angular separation below which two legs are considered the same particle
pub const GHOST_DELTA_R: f64 = 0.02;

// Impact parameter significance
pub const MAX_SIP: f64 = 4.0;

// Four-lepton level mass cuts (GeV)
pub const Z2_MASS_LOW: f64 = 4.0;
pub const Z2_MASS_HIGH: f64 = 140.0;
pub const MIN_MZ2: f64 = 12.0;
pub const MIN_MLL_ALL_COMB: f64 = 4.0;
pub const MIN_M4L: f64 = 70.0;
pub const MIN_M4L_FULLSEL: f64 = 100.0;
pub const MIN_PT_LEADING: f64 = 20.0;
pub const MIN_PT_SUBLEADING: f64 = 10.0;

// Two candidates whose Z1 masses differ by less than this share the same Z1
pub const SAME_Z1_MASS_TOLERANCE: f64 = 1e-4;

// PDG ids
pub const PDG_ELECTRON: i32 = 11;
pub const PDG_MUON: i32 = 13;
pub const PDG_TAU: i32 = 15;
pub const PDG_PHOTON: i32 = 22;
