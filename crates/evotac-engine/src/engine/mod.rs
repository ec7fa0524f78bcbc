//! Game flow built on top of the [`core`](crate::core) data types.
//!
//! - [`play_match`] - Plays one full game between two [`Policy`] implementations
//! - [`GameRecord`] - Serializable record of a finished game
//! - [`ReplayCursor`] - Steps through a recorded game move by move

pub use self::{game_match::*, record::*, replay::*};

mod game_match;
mod record;
mod replay;
