/* 📖 # Why a PokemonStore trait?

The API service never knows where records live. It holds a StoreHandle and
calls one store operation per request, so the same routes run against the
plain in-memory map, the JSON-file-backed store, or a deliberately failing
store in tests. Stores answer "absent" with `Ok(None)` and leave it to the API
to turn that into a 404; a duplicate id on insert is an `ErrorKind::Conflict`.
*/

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::instrument;

use pokedex_base::PokedexResult;

use crate::input::UpdatePokemon;
use crate::pokemon::{Pokemon, PokemonId};
use crate::search::NameSearch;

/// Storage for the record collection, keyed by domain id.
pub trait PokemonStore: Send + Sync + 'static {
    /// All records, in store order.
    fn list(&self) -> PokedexResult<Vec<Pokemon>>;

    /// At most `limit` records after skipping `skip`, in store order.
    fn list_page(&self, skip: usize, limit: usize) -> PokedexResult<Vec<Pokemon>> {
        Ok(self.list()?.into_iter().skip(skip).take(limit).collect())
    }

    /// Records whose localized names match `search`, in store order.
    fn search(&self, search: &NameSearch) -> PokedexResult<Vec<Pokemon>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|pokemon| search.matches(pokemon))
            .collect())
    }

    fn get(&self, id: PokemonId) -> PokedexResult<Option<Pokemon>>;

    fn contains(&self, id: PokemonId) -> PokedexResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Add a new record and return it as stored.
    ///
    /// Fails with `ErrorKind::Conflict` when the id is already taken.
    fn insert(&mut self, pokemon: Pokemon) -> PokedexResult<Pokemon>;

    /// Apply `patch` to the record with `id` and return the result.
    ///
    /// Returns `Ok(None)` when no such record exists; never inserts.
    fn update(&mut self, id: PokemonId, patch: UpdatePokemon) -> PokedexResult<Option<Pokemon>>;

    /// Remove and return the record with `id`, if it existed.
    fn remove(&mut self, id: PokemonId) -> PokedexResult<Option<Pokemon>>;

    fn clear(&mut self) -> PokedexResult<()>;

    fn len(&self) -> PokedexResult<usize>;

    fn is_empty(&self) -> PokedexResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// A thread-safe, cheaply cloneable handle to a store.
///
/// Reads take a shared lock and run concurrently; writes are exclusive.
///
/// ```
/// use pokedex_engine::store::{InMemoryStore, StoreHandle};
///
/// let store = StoreHandle::new(InMemoryStore::new());
/// let clone = store.clone();
/// assert!(clone.is_empty().unwrap());
/// ```
#[derive(Clone)]
pub struct StoreHandle(Arc<RwLock<dyn PokemonStore>>);

impl StoreHandle {
    pub fn new<S: PokemonStore>(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    #[instrument(skip(self))]
    pub fn list(&self) -> PokedexResult<Vec<Pokemon>> {
        self.0.read().list()
    }

    #[instrument(skip(self))]
    pub fn list_page(&self, skip: usize, limit: usize) -> PokedexResult<Vec<Pokemon>> {
        self.0.read().list_page(skip, limit)
    }

    #[instrument(skip(self, search), fields(query = search.query()))]
    pub fn search(&self, search: &NameSearch) -> PokedexResult<Vec<Pokemon>> {
        self.0.read().search(search)
    }

    #[instrument(skip(self), fields(pokemon_id = %id))]
    pub fn get(&self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        self.0.read().get(id)
    }

    pub fn contains(&self, id: PokemonId) -> PokedexResult<bool> {
        self.0.read().contains(id)
    }

    #[instrument(skip(self, pokemon), fields(pokemon_id = %pokemon.id))]
    pub fn insert(&self, pokemon: Pokemon) -> PokedexResult<Pokemon> {
        self.0.write().insert(pokemon)
    }

    #[instrument(skip(self, patch), fields(pokemon_id = %id))]
    pub fn update(&self, id: PokemonId, patch: UpdatePokemon) -> PokedexResult<Option<Pokemon>> {
        self.0.write().update(id, patch)
    }

    #[instrument(skip(self), fields(pokemon_id = %id))]
    pub fn remove(&self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        self.0.write().remove(id)
    }

    pub fn clear(&self) -> PokedexResult<()> {
        self.0.write().clear()
    }

    pub fn len(&self) -> PokedexResult<usize> {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> PokedexResult<bool> {
        self.0.read().is_empty()
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}
