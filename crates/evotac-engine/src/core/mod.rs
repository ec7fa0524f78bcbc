pub use self::{board::*, rules::*, side::*};

mod board;
mod rules;
mod side;
