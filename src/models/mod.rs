pub mod client;
pub mod enums;
pub mod lab;

pub use client::*;
pub use enums::*;
pub use lab::*;
