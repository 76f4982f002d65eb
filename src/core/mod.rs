pub mod combat;
pub mod dice;
pub mod logging;
pub mod roster;
