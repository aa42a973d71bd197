//! Orrery application: window host, keyboard control panel, and headless driver.

pub mod controls;
pub mod headless;
pub mod platform;
pub mod window;
