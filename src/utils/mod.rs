pub mod dates;
pub mod errors;
pub mod format;

pub use errors::error_chain;
pub use format::DisplayLocale;
