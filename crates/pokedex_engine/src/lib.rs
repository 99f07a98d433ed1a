/* 📖 # What does pokedex_engine contain?

The domain and the HTTP API of the Pokédex, independent of any real I/O:
- pokemon, input: the record model and the validated request bodies
- page, search: pagination and name search over the collection
- store: the PokemonStore trait with in-memory and JSON-file implementations
- config: `pokedex.toml` loading
- api: the HttpService that maps routes onto store operations

All filesystem and network access goes through the PalHandle from
pokedex_base, so the whole engine runs against MockPal in tests.
*/

pub mod api;
pub mod config;
pub mod input;
pub mod page;
pub mod pokemon;
pub mod search;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use api::{ApiDocs, ApiService, AssetService};
pub use config::{CONFIG_FILE, Config, PORT_ENV, load_config};
pub use input::{CreatePokemon, UpdatePokemon};
pub use page::{PAGE_SIZE, Page, PageRequest};
pub use pokemon::{BaseStats, Pokemon, PokemonId, PokemonName};
pub use search::NameSearch;
pub use store::{InMemoryStore, JsonFileStore, PokemonStore, StoreHandle, open_store};
