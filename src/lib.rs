pub mod fetch;
pub mod layers;
pub mod loader;
pub mod output;
pub mod traffic;
