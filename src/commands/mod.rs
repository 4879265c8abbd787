pub mod generate;
pub mod split;
