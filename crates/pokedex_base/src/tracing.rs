use crate::error::{PokedexError, PokedexResult};
use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber: fmt output filtered by `RUST_LOG`, plus the
/// ErrorLayer so `PokedexError` can capture span traces.
pub fn init_tracing() -> PokedexResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| {
            Box::new(PokedexError::message(format!(
                "Failed to initialize tracing: {}",
                e
            )))
        })
}
