pub mod analysis;

pub use analysis::AnalysisGateway;
