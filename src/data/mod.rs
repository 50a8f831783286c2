pub mod character;
pub mod effect;
pub mod error;
pub mod loader;
pub mod registry;
pub mod validate;

pub use character::{Character, CharacterCatalog};
pub use effect::{Effect, EffectCatalog, EffectCategory};
pub use error::DataError;
pub use registry::{DataRegistry, RegistryHandle, RegistryStatus};
pub use validate::{validate_catalogs, ValidationReport, ValidationSeverity};

/// Data directory used when neither configuration nor a CLI flag names one.
pub const DEFAULT_DATA_DIR: &str = "data";
