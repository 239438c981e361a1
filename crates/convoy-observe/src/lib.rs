mod logger;
pub use logger::*;

mod reporter;
pub use reporter::LogReporter;
