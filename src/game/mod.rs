pub mod board;
pub mod fen;
pub mod history;
pub mod moves;
pub mod pieces;
pub mod square;
pub mod tables;

pub use board::*;
pub use fen::*;
pub use history::*;
pub use moves::*;
pub use pieces::*;
pub use square::*;
pub use tables::*;
