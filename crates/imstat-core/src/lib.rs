pub mod error;
pub mod consts;
pub mod section;
pub mod io;
pub mod region;
pub mod clip;
pub mod stats;
pub mod fields;
pub mod report;
pub mod pipeline;
