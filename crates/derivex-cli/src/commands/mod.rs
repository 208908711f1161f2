pub mod demo;
pub mod resolve;
pub mod tree;
