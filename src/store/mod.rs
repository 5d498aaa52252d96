pub mod config;
pub mod input;
pub mod presets;
pub mod status;

pub use config::ConfigStore;
pub use input::InputStore;
pub use presets::PresetStore;
pub use status::{LintState, LintStatusStore};
