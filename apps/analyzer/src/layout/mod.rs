// Layout packing: panel text formatting, height estimation, slide packing and
// anomaly logging. Pure and synchronous; the pipeline runs it on a blocking
// thread.

pub mod anomaly;
pub mod font_metrics;
pub mod format;
pub mod measure;
pub mod packer;

// Re-export the public API consumed by the pipeline and renderer.
pub use anomaly::generate_log_id;
pub use font_metrics::{default_panel_config, PanelConfig};
pub use format::PanelText;
pub use measure::create_measurement_container;
pub use packer::{build_slides, PackOutcome, DEFAULT_CAPACITY};
