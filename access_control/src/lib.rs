#![no_std]
pub mod access;
pub mod errors;
pub mod events;
pub mod role;
mod storage;
pub mod utils;

mod test;
