//! mentor-dash — terminal client for a student learning dashboard backed by
//! an AI tutoring API.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod logger;
pub mod mock;
pub mod models;
pub mod parse;
pub mod prompt;
pub mod render;
pub mod screens;
pub mod tutor;
