pub mod array;
pub mod bean;
pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod morphers;
pub mod registry;
pub mod standard;
