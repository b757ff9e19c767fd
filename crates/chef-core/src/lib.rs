#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod forecast;
pub mod matching;
pub mod prices;
pub mod session;
pub mod traits;
pub mod translate;
pub mod types;
