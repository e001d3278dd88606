// constants and kinematics
pub mod constants;
pub mod error;
pub mod kinematics;
pub mod config;

// data module
pub mod data {
    pub mod event;
    pub mod object;
    pub mod pair;
    pub mod quad;
    pub mod region;
}

// selection of physics objects
pub mod select {
    pub mod objects;
    pub mod jets;
}

// candidate combinatorics
pub mod combine {
    pub mod pairs;
    pub mod quads;
    pub mod trilepton;
}

// selection regions and arbitration
pub mod region {
    pub mod setup;
    pub mod control;
    pub mod arbitration;
    #[cfg(test)]
    mod fixtures;
}

pub mod pipeline;

// Re-export commonly used types
pub use config::{AnalysisConfig, RawAnalysisConfig, RunPeriodConstants};
pub use data::event::Event;
pub use data::region::{Region, RegionMask};
pub use error::{Error, Result};
pub use pipeline::{EventProcessor, EventResult};
