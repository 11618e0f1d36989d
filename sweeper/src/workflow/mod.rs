pub mod config;
pub mod demo;
pub mod process;
pub mod protocol;
pub mod sweep;
#[cfg(test)]
pub mod testutil;
pub mod worker;
