pub mod collision;
pub mod lifetime;
pub mod movement;

pub use collision::*;
pub use lifetime::*;
pub use movement::*;
