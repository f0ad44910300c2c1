mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{api_key, params_hash, ApiType, CacheParams, KEY_NAMESPACE, session_prefix};
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::CacheStore;
