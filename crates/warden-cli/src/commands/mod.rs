pub mod blocking;
pub mod resolve;
pub mod run;
pub mod scripts;
pub mod tool;
