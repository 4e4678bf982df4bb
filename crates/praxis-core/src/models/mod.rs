pub mod change;
pub mod client;
pub mod instance;
pub mod score;
pub mod scoring;
pub mod template;
