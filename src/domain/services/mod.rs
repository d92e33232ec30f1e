pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod dashboard;
pub mod events;
mod health;
mod metric_cards;
mod scroll;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use dashboard::*;
pub use health::*;
pub use metric_cards::*;
pub use scroll::*;
