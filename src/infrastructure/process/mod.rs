//! ProcessSpawner implementations

mod command;

pub use command::CommandSpawner;
