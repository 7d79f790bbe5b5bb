mod app;
pub mod cli;
pub mod logging;
pub mod output;

pub use app::App;
