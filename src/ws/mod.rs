pub mod broadcast;
pub mod error;
pub mod registry;
pub mod room;
pub mod samples;
pub mod session;

pub use broadcast::{Outbound, Recipient};
pub use error::RoomError;
pub use registry::{RoomRegistry, RoomSnapshot};
pub use room::Room;
pub use session::{Outbox, PushError, Session, DEFAULT_DISPLAY_NAME, DEFAULT_OUTBOX_CAPACITY};
