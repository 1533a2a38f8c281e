// HBnB Console - Core Library
// Models, class registry, JSON file storage and the command console

pub mod attributes; // Typed attribute values + per-class default schemas
pub mod command;    // Line parser: shell tokens and Class.command(...) syntax
pub mod console;    // Dispatcher + read-eval loop
pub mod models;     // Model record, variants, class registry
pub mod settings;   // hbnb.toml / HBNB_* configuration
pub mod storage;    // Identity map + JSON persistence

// Re-export commonly used types
pub use attributes::{AttributeDefinition, AttributeSchema, AttributeType, AttributeValue, CoercionError};
pub use command::{parse_line, ParseError, ParsedLine, Syntax};
pub use console::{CommandError, Console, Reply};
pub use models::{ClassEntry, ClassRegistry, Model, ModelError, ModelKind, UnknownClass};
pub use settings::ConsoleSettings;
pub use storage::{FileStorage, StorageError, DEFAULT_FILE_PATH};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
