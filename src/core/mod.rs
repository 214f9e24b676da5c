pub mod card;
pub mod card_view;
pub mod error;
pub mod formatter;
pub mod intent;
pub mod job;
pub mod state;
pub mod sync;
