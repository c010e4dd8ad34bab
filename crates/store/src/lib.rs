#![warn(missing_docs)]
//! Durable item storage and the planogram offset record.

pub mod codec;
pub mod export;
pub mod repository;
pub mod store;

pub use codec::{decode_planogram, encode_planogram};
pub use export::ExportStore;
pub use repository::{Repository, PLANOGRAM_FILE};
pub use store::{ItemStore, MemoryStore};
