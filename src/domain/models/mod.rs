mod action;
mod backend;
mod benchmark;
mod event;
mod health;
mod loading;
mod message;
mod role;
mod source;
mod textarea;

pub use action::*;
pub use backend::*;
pub use benchmark::*;
pub use event::*;
pub use health::*;
pub use loading::*;
pub use message::*;
pub use role::*;
pub use source::*;
pub use textarea::*;
