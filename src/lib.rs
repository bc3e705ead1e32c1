pub mod asy;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod isoweek;
pub mod layout;
pub mod locale;
pub mod pages;
pub mod render;
pub mod script;
