pub mod config;
pub mod error;
pub mod logging;

// Scroll-aware logging facility and live ticker
pub mod ansi;
pub mod facility;
pub mod handler;
pub mod level;
pub mod recent;
pub mod record;
pub mod render;
pub mod sink;
pub mod term;
pub mod text;
pub mod ticker;
pub mod writer;

pub use error::TickerError;
pub use facility::Logger;
pub use level::Level;
