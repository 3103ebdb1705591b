pub mod diagnostics;
pub mod error;
pub mod health;
pub mod messages;
pub mod room_info;
pub mod run_code;

pub use diagnostics::*;
pub use error::*;
pub use health::*;
pub use messages::*;
pub use room_info::*;
pub use run_code::*;
