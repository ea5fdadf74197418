pub mod camera;
pub mod chat;
pub mod view;

pub use camera::Camera;
pub use chat::{ChatAction, ChatLog, ChatRole, SendGate};
pub use view::{ViewAction, ViewState};
