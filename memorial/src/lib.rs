//! Memorial site core
//!
//! Content, moderation and notification logic for a bilingual memorial
//! site: guest notes with admin approval, an ordered photo gallery and
//! contact list, editable page content and a per-session visit counter.

pub mod app;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod seed;
pub mod services;
pub mod storage;
