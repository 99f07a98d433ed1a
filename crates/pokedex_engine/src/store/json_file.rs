/* 📖 # Why persist through the PAL?

JsonFileStore keeps an InMemoryStore as its working set and rewrites the whole
JSON array after every successful mutation. Going through the PAL means tests
run against MockPal and can inspect exactly what was written, or make writes
fail, without touching the disk. If the write fails the in-memory change is
rolled back, so memory and file never disagree about what was accepted.
*/

use tracing::{debug, info, instrument, warn};

use pokedex_base::{FilePath, PalHandle, PokedexError, PokedexResult, ResultExt};

use crate::input::UpdatePokemon;
use crate::pokemon::{Pokemon, PokemonId};
use crate::store::memory::InMemoryStore;
use crate::store::traits::PokemonStore;

/// Read a JSON array of records. A missing file is an empty collection.
#[instrument(skip(pal), fields(path = %path))]
pub fn load_records(pal: &PalHandle, path: &FilePath) -> PokedexResult<Vec<Pokemon>> {
    if !pal.file_exists(path)? {
        debug!("data file does not exist, starting empty");
        return Ok(Vec::new());
    }
    let bytes = pal
        .read_file_to_bytes(path)
        .with_context(|| format!("reading {}", path))?;
    let records: Vec<Pokemon> = serde_json::from_slice(&bytes).map_err(|e| {
        Box::new(PokedexError::message(format!(
            "Failed to parse {}: {}",
            path, e
        )))
    })?;
    info!(count = records.len(), "loaded records");
    Ok(records)
}

/// An in-memory store mirrored to a JSON file after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    pal: PalHandle,
    path: FilePath,
    inner: InMemoryStore,
}

impl JsonFileStore {
    /// Open the store, loading `path` if it exists.
    pub fn open(pal: PalHandle, path: FilePath) -> PokedexResult<Self> {
        let records = load_records(&pal, &path)?;
        let inner = InMemoryStore::from_records(records)
            .with_context(|| format!("loading {}", path))?;
        Ok(Self { pal, path, inner })
    }

    pub fn path(&self) -> &FilePath {
        &self.path
    }

    fn persist(&self) -> PokedexResult<()> {
        let records = self.inner.list()?;
        let json = serde_json::to_vec_pretty(&records).map_err(|e| {
            Box::new(PokedexError::message(format!(
                "Failed to serialize records: {}",
                e
            )))
        })?;
        if let Some(dir) = self.path.parent() {
            self.pal.create_directory_all(&dir)?;
        }
        self.pal
            .write_file(&self.path, &json)
            .with_context(|| format!("writing {}", self.path))?;
        debug!(path = %self.path, count = records.len(), "persisted records");
        Ok(())
    }

    /// Persist, or undo the in-memory change with `rollback` and report the failure.
    fn persist_or_rollback(
        &mut self,
        rollback: impl FnOnce(&mut InMemoryStore) -> PokedexResult<()>,
    ) -> PokedexResult<()> {
        if let Err(e) = self.persist() {
            warn!(path = %self.path, error = %e, "persisting failed, rolling back");
            rollback(&mut self.inner)?;
            return Err(e);
        }
        Ok(())
    }
}

impl PokemonStore for JsonFileStore {
    fn list(&self) -> PokedexResult<Vec<Pokemon>> {
        self.inner.list()
    }

    fn list_page(&self, skip: usize, limit: usize) -> PokedexResult<Vec<Pokemon>> {
        self.inner.list_page(skip, limit)
    }

    fn get(&self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        self.inner.get(id)
    }

    fn contains(&self, id: PokemonId) -> PokedexResult<bool> {
        self.inner.contains(id)
    }

    fn insert(&mut self, pokemon: Pokemon) -> PokedexResult<Pokemon> {
        let id = pokemon.id;
        let stored = self.inner.insert(pokemon)?;
        self.persist_or_rollback(|inner| inner.remove(id).map(|_| ()))?;
        Ok(stored)
    }

    fn update(&mut self, id: PokemonId, patch: UpdatePokemon) -> PokedexResult<Option<Pokemon>> {
        let Some(previous) = self.inner.get(id)? else {
            return Ok(None);
        };
        let updated = self.inner.update(id, patch)?;
        self.persist_or_rollback(|inner| {
            inner.remove(id)?;
            inner.insert(previous).map(|_| ())
        })?;
        Ok(updated)
    }

    fn remove(&mut self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        let Some(removed) = self.inner.remove(id)? else {
            return Ok(None);
        };
        let restore = removed.clone();
        self.persist_or_rollback(|inner| inner.insert(restore).map(|_| ()))?;
        Ok(Some(removed))
    }

    fn clear(&mut self) -> PokedexResult<()> {
        let previous = std::mem::take(&mut self.inner);
        self.persist_or_rollback(|inner| {
            *inner = previous;
            Ok(())
        })
    }

    fn len(&self) -> PokedexResult<usize> {
        self.inner.len()
    }

    fn is_empty(&self) -> PokedexResult<bool> {
        self.inner.is_empty()
    }
}
