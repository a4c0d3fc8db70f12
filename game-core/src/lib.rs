pub mod game_events;
pub mod registry;
pub mod relay;
pub mod room;
pub mod room_code;
pub mod roster;
pub mod scoring;
pub mod turn;
pub mod vote_kick;
pub mod word_validation;

// Re-export main components
pub use game_events::*;
pub use registry::*;
pub use room::*;
pub use room_code::*;
pub use roster::*;
pub use scoring::*;
pub use turn::*;
pub use vote_kick::*;
pub use word_validation::*;
