pub mod audit;
pub mod chart;
pub mod config;
pub mod constants;
pub mod csv;
pub mod error;
pub mod http;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod sources;
pub mod table;
