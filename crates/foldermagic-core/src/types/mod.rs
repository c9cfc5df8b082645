//! Core type definitions used across the FolderMagic workspace.

pub mod action_type;

pub use action_type::ActionType;
