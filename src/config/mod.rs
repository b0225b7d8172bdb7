//! Configuration management for the yield analytics engine

pub mod settings;
pub mod reference;

pub use settings::*;
pub use reference::*;

use lazy_static::lazy_static;

lazy_static! {
    pub static ref CONFIG: Config = Config::load();
}
