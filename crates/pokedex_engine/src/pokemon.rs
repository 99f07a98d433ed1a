/* 📖 # Why a typed record instead of raw JSON values?

Every record in the collection has the same five top-level fields. Modelling
them as structs means the store, the search and the API all agree on the shape,
and a seed file with a misspelled stat name fails at load time instead of
producing records that silently lack a field. JSON field names (`type`, `HP`,
`SpecialAttack`, ...) are kept through serde renames so the wire format stays
what clients expect.
*/

use serde::{Deserialize, Serialize};

/// Domain identifier of a record, as used in `/pokemons/:id`.
///
/// This is the caller-chosen `id` field, not any storage-internal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonId(i64);

impl PokemonId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Parse a path segment. Anything that is not a plain integer yields
    /// `None`, which the API treats as an id that matches no record.
    ///
    /// ```
    /// use pokedex_engine::PokemonId;
    ///
    /// assert_eq!(PokemonId::parse("25"), Some(PokemonId::new(25)));
    /// assert_eq!(PokemonId::parse("pikachu"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i64>().ok().map(Self)
    }
}

impl std::fmt::Display for PokemonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PokemonId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Display names keyed by language. Any subset of the four may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PokemonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub french: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese: Option<String>,
}

impl PokemonName {
    /// All present names, in english, french, japanese, chinese order.
    pub fn localized(&self) -> impl Iterator<Item = &str> {
        [&self.english, &self.french, &self.japanese, &self.chinese]
            .into_iter()
            .filter_map(|name| name.as_deref())
    }

    /// True when at least one present name has non-whitespace content.
    pub fn has_any(&self) -> bool {
        self.localized().any(|name| !name.trim().is_empty())
    }
}

/// The six base stats of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseStats {
    #[serde(rename = "HP")]
    pub hp: u32,
    #[serde(rename = "Attack")]
    pub attack: u32,
    #[serde(rename = "Defense")]
    pub defense: u32,
    #[serde(rename = "SpecialAttack")]
    pub special_attack: u32,
    #[serde(rename = "SpecialDefense")]
    pub special_defense: u32,
    #[serde(rename = "Speed")]
    pub speed: u32,
}

/// One record of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: PokemonName,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub base: BaseStats,
    pub image: String,
}
