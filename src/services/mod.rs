//! Core services for locating the source, walking it, and writing snapshots

pub mod format;
pub mod locate;
pub mod prepare;
pub mod schedule;
pub mod sink;
pub mod timestamp;
pub mod traverse;
