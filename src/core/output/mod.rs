//! Record writers and readers.
//!
//! - [`write_messages_csv`] / [`to_messages_csv`] - `date,time,sender,message` table
//! - [`write_context_csv`] / [`to_context_csv`] - `role,content` table
//! - [`read_messages_csv`] / [`read_context_csv`] - read the tables back
//! - [`write_messages_json`] / [`write_context_json`] - same records as JSON arrays
//! - [`write_combined_export`] - the per-file answer artifact of the `send` step
//!
//! # Example
//!
//! ```rust,no_run
//! use chatctx::core::output::{write_context_csv, write_messages_csv};
//! use chatctx::core::RoleMap;
//! use chatctx::ParsedMessage;
//! use std::path::Path;
//!
//! let messages = vec![
//!     ParsedMessage::new("24/07/2025", "11:22", Some("Mavi – Mosaic"), "Olá!"),
//!     ParsedMessage::new("24/07/2025", "11:23", Some("Ana"), "Oi, tudo bem?"),
//! ];
//! let context = RoleMap::default().to_context(&messages);
//!
//! write_messages_csv(&messages, Path::new("lead_parsed.csv"))?;
//! write_context_csv(&context, Path::new("context_lead_parsed.csv"))?;
//! # Ok::<(), chatctx::ChatctxError>(())
//! ```

mod csv_writer;
mod json_writer;

pub use csv_writer::{
    CONTEXT_HEADER, MESSAGES_HEADER, context_from_csv, messages_from_csv, read_context_csv,
    read_messages_csv, to_context_csv, to_messages_csv, write_context_csv, write_messages_csv,
};
pub use json_writer::{
    EXPORT_STAMP_FORMAT, ModelExchange, combined_export_name, to_context_json, to_messages_json,
    write_combined_export, write_context_json, write_messages_json,
};
