pub mod dispatcher;
pub mod handler;
pub mod msg_chat_handler;
pub mod msg_code_change_handler;
pub mod msg_create_room_handler;
pub mod msg_join_room_handler;
pub mod msg_leave_room_handler;
pub mod msg_ping_handler;
pub mod msg_typing_handler;

pub use dispatcher::Dispatcher;
pub use handler::websocket_handler;
