pub mod health;
pub mod pages;
pub mod recommendations;

pub use health::health_check;
pub use pages::pages_config;
pub use recommendations::recommendations_config;
