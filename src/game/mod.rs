pub mod driver;
pub mod grid;
pub mod player;
