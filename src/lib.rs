pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod error;
pub mod model;
pub mod source;
pub mod svg;
pub mod view;
