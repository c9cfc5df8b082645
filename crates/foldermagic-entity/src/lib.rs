//! # foldermagic-entity
//!
//! Domain models for FolderMagic. Every struct in this crate is a plain
//! value object that derives `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`; actions additionally validate themselves on
//! construction and deserialization.

pub mod action;
pub mod structure;
pub mod tree;
