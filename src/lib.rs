//! Card-database import library - shared modules for the CLI.

pub mod builder;
pub mod classify;
pub mod ident;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod tables;
pub mod writer;
