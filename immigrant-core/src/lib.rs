//! immigrant-core: statement types, configuration and transaction type rules
//! shared by the CSV parser and the OFX emitter.

pub mod config;
pub mod error;
pub mod statement;
pub mod time;
pub mod trntype;

pub use config::{ColumnAliases, StatementConfig};
pub use error::{ConfigError, FormatError};
pub use statement::{AccountId, FitId, Statement, StatementMetadata, TransactionRecord};
pub use trntype::{TransactionType, classify};
