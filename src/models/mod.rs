pub mod action_item;
pub mod agenda_item;
pub mod meeting;
pub mod status;
pub mod territory;

pub use action_item::ActionItem;
pub use agenda_item::AgendaItem;
pub use meeting::Meeting;
pub use status::Status;
pub use territory::Territory;
