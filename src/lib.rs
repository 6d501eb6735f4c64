pub mod controller;
pub mod game;
pub mod utils;


pub use controller::*;
pub use game::*;
pub use utils::*;
