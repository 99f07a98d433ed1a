pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::{JsonFileStore, load_records};
pub use memory::InMemoryStore;
pub use traits::{PokemonStore, StoreHandle};

use tracing::info;

use pokedex_base::{PalHandle, PokedexResult, ResultExt};

use crate::config::Config;

/// Build the store described by `config`.
///
/// With `persist` the data file is loaded and kept up to date; otherwise it
/// only seeds an in-memory store and later changes are lost on restart.
pub fn open_store(pal: &PalHandle, config: &Config) -> PokedexResult<StoreHandle> {
    let path = config.data_file();
    let store = if config.persist {
        let store = JsonFileStore::open(pal.clone(), path.clone())?;
        info!(path = %path, count = store.len()?, "opened persistent store");
        StoreHandle::new(store)
    } else {
        let records = load_records(pal, &path)?;
        let store = InMemoryStore::from_records(records)
            .with_context(|| format!("loading {}", path))?;
        info!(path = %path, count = store.len()?, "seeded in-memory store");
        StoreHandle::new(store)
    };
    Ok(store)
}
