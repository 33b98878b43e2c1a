pub mod playback;
pub mod providers;
pub mod search;
pub mod settings;

pub use providers::{MediaClient, MediaClientFactory};
pub use settings::{ConfigProvider, FileConfigProvider, StaticConfigProvider};
