pub mod record;
pub mod session;

pub use record::LogRecord;
pub use session::Session;
