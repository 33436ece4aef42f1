//! Catalogue It library
//!
//! Core data model and persistence for cataloguing personal collections:
//! catalogues with user-defined typed fields, owned and wishlist items,
//! and item photos.

pub mod app;
pub mod color;
pub mod config;
pub mod database;
pub mod display;
pub mod error;
pub mod services;
pub mod storage;
