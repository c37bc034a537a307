//! Core record processing for chatctx.
//!
//! This module contains:
//! - [`roles`] - sender identity to role mapping
//! - [`output`] - table writers and readers (CSV, JSON) and the combined export
//!
//! # Quick Start
//!
//! ```rust
//! use chatctx::core::{RoleMap, to_context_csv};
//! use chatctx::ParsedMessage;
//!
//! let messages = vec![ParsedMessage::new("24/07/2025", "11:23", Some("Ana"), "Oi")];
//! let csv = to_context_csv(&RoleMap::default().to_context(&messages))?;
//! assert_eq!(csv, "role,content\nuser,Oi\n");
//! # Ok::<(), chatctx::ChatctxError>(())
//! ```

pub mod output;
pub mod roles;

pub use roles::{DEFAULT_ASSISTANT, RoleMap};

pub use output::{
    ModelExchange, read_context_csv, read_messages_csv, to_context_csv, to_context_json,
    to_messages_csv, to_messages_json, write_combined_export, write_context_csv,
    write_context_json, write_messages_csv, write_messages_json,
};
