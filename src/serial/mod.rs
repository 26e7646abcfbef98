pub mod errors;
pub mod fake;
pub mod sync;

pub use sync::SerialPort;
