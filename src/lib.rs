//! Dog agility record keeping: venue scoring configurations, trial and
//! run records, title tracking, and the migration machinery that keeps
//! old record books working as configurations evolve.
//!
//! The document model mirrors the XML file format: [`book::AgilityRecordBook`]
//! is the root, holding the calendar, training log, [`config::Config`],
//! the Info section, and the dogs. Every entity loads from an
//! [`element::ElementNode`] with a version so old files keep reading,
//! and saves back out at the current format.

pub mod book;
pub mod calendar;
pub mod callbacks;
pub mod cli;
pub mod config;
pub mod date;
pub mod dog;
pub mod element;
pub mod errors;
pub mod exitcode;
pub mod info;
pub mod messages;
pub mod schema;
pub mod settings;
pub mod training;
pub mod types;
pub mod xml;

pub use book::{current_doc_version, AgilityRecordBook};
pub use callbacks::{ErrorCallback, ErrorLog};
pub use element::ElementNode;
pub use errors::{ArbError, ArbResult};
pub use types::{ArbVersion, Lookup, Q};
