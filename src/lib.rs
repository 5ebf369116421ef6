pub mod clam;
pub mod terrain;
