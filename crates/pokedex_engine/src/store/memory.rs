/* 📖 # Why a BTreeMap keyed by id?

Listing and pagination walk the store in order, and skip/limit only make sense
if that order is the same from one request to the next. Keying a BTreeMap by
the domain id gives ascending-id order for free, O(log n) lookups, and makes
the uniqueness check on insert a single `contains_key`.
*/

use std::collections::BTreeMap;

use tracing::debug;

use pokedex_base::{ErrorKind, PokedexError, PokedexResult};

use crate::input::UpdatePokemon;
use crate::pokemon::{Pokemon, PokemonId};
use crate::store::traits::PokemonStore;

/// Records held in memory, ordered by ascending id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    pokemons: BTreeMap<PokemonId, Pokemon>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed records.
    ///
    /// Every duplicated id is reported; the store is only built when there
    /// are none.
    pub fn from_records(records: Vec<Pokemon>) -> PokedexResult<Self> {
        let mut store = Self::new();
        let mut errors = Vec::new();
        for pokemon in records {
            if let Err(e) = store.insert(pokemon) {
                errors.push(*e);
            }
        }
        match errors.len() {
            0 => Ok(store),
            1 => Err(Box::new(errors.remove(0))),
            count => Err(Box::new(PokedexError::new(ErrorKind::Multiple {
                errors,
                count,
            }))),
        }
    }
}

fn conflict(id: PokemonId) -> Box<PokedexError> {
    Box::new(PokedexError::conflict(format!(
        "Pokemon with id {} already exists",
        id
    )))
}

impl PokemonStore for InMemoryStore {
    fn list(&self) -> PokedexResult<Vec<Pokemon>> {
        Ok(self.pokemons.values().cloned().collect())
    }

    fn list_page(&self, skip: usize, limit: usize) -> PokedexResult<Vec<Pokemon>> {
        Ok(self
            .pokemons
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn get(&self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        Ok(self.pokemons.get(&id).cloned())
    }

    fn contains(&self, id: PokemonId) -> PokedexResult<bool> {
        Ok(self.pokemons.contains_key(&id))
    }

    fn insert(&mut self, pokemon: Pokemon) -> PokedexResult<Pokemon> {
        if self.pokemons.contains_key(&pokemon.id) {
            return Err(conflict(pokemon.id));
        }
        debug!(pokemon_id = %pokemon.id, "inserting record");
        self.pokemons.insert(pokemon.id, pokemon.clone());
        Ok(pokemon)
    }

    fn update(&mut self, id: PokemonId, patch: UpdatePokemon) -> PokedexResult<Option<Pokemon>> {
        let Some(stored) = self.pokemons.get_mut(&id) else {
            return Ok(None);
        };
        // Patch a copy so a rejected update leaves the stored record untouched
        let mut updated = stored.clone();
        patch.apply_to(&mut updated)?;
        *stored = updated.clone();
        debug!(pokemon_id = %id, "updated record");
        Ok(Some(updated))
    }

    fn remove(&mut self, id: PokemonId) -> PokedexResult<Option<Pokemon>> {
        Ok(self.pokemons.remove(&id))
    }

    fn clear(&mut self) -> PokedexResult<()> {
        self.pokemons.clear();
        Ok(())
    }

    fn len(&self) -> PokedexResult<usize> {
        Ok(self.pokemons.len())
    }

    fn is_empty(&self) -> PokedexResult<bool> {
        Ok(self.pokemons.is_empty())
    }
}
