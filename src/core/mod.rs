//! Core protocol engine

pub mod decode;
pub mod protocol;
pub mod registers;
pub mod session;
pub mod transport;
