pub mod orchestrator;
pub mod selection;

pub use orchestrator::ShippingOrchestrator;
pub use selection::select_provider;
