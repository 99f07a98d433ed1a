/* 📖 # Why have pokedex_base as a core library?
pokedex_base provides the foundational error handling, tracing setup and the
platform abstraction layer used by the engine and the CLI. Keeping it separate
prevents circular dependencies and lets the engine be tested against MockPal.
*/

pub mod error;
mod error_tests;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, PokedexError, PokedexResult, ResultExt};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
