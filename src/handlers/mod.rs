pub mod diagnostics;
pub mod health;
pub mod room_info;
pub mod run_code;

pub use diagnostics::*;
pub use health::*;
pub use room_info::*;
pub use run_code::*;
