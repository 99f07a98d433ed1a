/* 📖 # Why separate input structures for create and update?

Request bodies arrive as arbitrary JSON. Deserializing them into dedicated
structs with `deny_unknown_fields` rejects misspelled or extra fields up front,
and the `validate` pass enforces the rules serde cannot express (non-blank
names, at least one type). Every failure is an `ErrorKind::Validation` whose
message goes back to the caller unchanged in the 400 body.

Create needs every field. Update makes every field optional: present fields
replace the stored ones, absent fields are left alone.
*/

use serde::Deserialize;

use pokedex_base::{PokedexError, PokedexResult};

use crate::pokemon::{BaseStats, Pokemon, PokemonId, PokemonName};

/// Body of `POST /pokemons`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePokemon {
    pub id: PokemonId,
    pub name: PokemonName,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub base: BaseStats,
    pub image: String,
}

impl CreatePokemon {
    /// Parse and validate a request body.
    pub fn from_json(body: &[u8]) -> PokedexResult<Self> {
        let input: Self = parse_body(body)?;
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> PokedexResult<()> {
        validate_name(&self.name)?;
        validate_types(&self.types)?;
        validate_image(&self.image)
    }

    pub fn into_pokemon(self) -> Pokemon {
        Pokemon {
            id: self.id,
            name: self.name,
            types: self.types,
            base: self.base,
            image: self.image,
        }
    }
}

/// Body of `PUT /pokemons/:id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePokemon {
    #[serde(default)]
    pub id: Option<PokemonId>,
    #[serde(default)]
    pub name: Option<PokemonName>,
    #[serde(default, rename = "type")]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub base: Option<BaseStats>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UpdatePokemon {
    /// Parse and validate a request body. An empty body is an empty update.
    pub fn from_json(body: &[u8]) -> PokedexResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let input: Self = parse_body(body)?;
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> PokedexResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(types) = &self.types {
            validate_types(types)?;
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        Ok(())
    }

    /// True when the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the present fields to `pokemon`.
    ///
    /// Ids are immutable: an `id` in the update must equal the record's id.
    pub fn apply_to(self, pokemon: &mut Pokemon) -> PokedexResult<()> {
        self.validate()?;
        if let Some(id) = self.id {
            if id != pokemon.id {
                return Err(Box::new(PokedexError::validation(format!(
                    "id cannot be changed (record {} was given id {})",
                    pokemon.id, id
                ))));
            }
        }
        if let Some(name) = self.name {
            pokemon.name = name;
        }
        if let Some(types) = self.types {
            pokemon.types = types;
        }
        if let Some(base) = self.base {
            pokemon.base = base;
        }
        if let Some(image) = self.image {
            pokemon.image = image;
        }
        Ok(())
    }
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> PokedexResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        Box::new(PokedexError::validation(format!(
            "Invalid request body: {}",
            e
        )))
    })
}

fn validate_name(name: &PokemonName) -> PokedexResult<()> {
    if name.has_any() {
        Ok(())
    } else {
        Err(Box::new(PokedexError::validation(
            "name must contain at least one non-blank localized name",
        )))
    }
}

fn validate_types(types: &[String]) -> PokedexResult<()> {
    if types.is_empty() {
        return Err(Box::new(PokedexError::validation(
            "type must contain at least one entry",
        )));
    }
    if types.iter().any(|t| t.trim().is_empty()) {
        return Err(Box::new(PokedexError::validation(
            "type entries must not be blank",
        )));
    }
    Ok(())
}

fn validate_image(image: &str) -> PokedexResult<()> {
    if image.trim().is_empty() {
        Err(Box::new(PokedexError::validation("image must not be blank")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_base::ErrorKind;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": {"french": "Pikachu"},
        "type": ["Electric"],
        "base": {"HP": 35, "Attack": 55, "Defense": 40, "SpecialAttack": 50, "SpecialDefense": 50, "Speed": 90},
        "image": "/assets/pokemons/025.png"
    }"#;

    fn validation_message(result: PokedexResult<impl std::fmt::Debug>) -> String {
        let err = result.unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::Validation { .. }),
            "expected validation error, got {:?}",
            err
        );
        err.to_string()
    }

    #[test]
    fn test_create_valid_body() {
        let input = CreatePokemon::from_json(PIKACHU.as_bytes()).unwrap();
        let pokemon = input.into_pokemon();
        assert_eq!(pokemon.id, PokemonId::new(25));
        assert_eq!(pokemon.name.french.as_deref(), Some("Pikachu"));
        assert_eq!(pokemon.base.speed, 90);
    }

    #[test]
    fn test_create_malformed_json() {
        let message = validation_message(CreatePokemon::from_json(b"{\"id\": 25"));
        assert!(message.starts_with("Invalid request body: "), "{}", message);
    }

    #[test]
    fn test_create_missing_field() {
        let message = validation_message(CreatePokemon::from_json(br#"{"id": 25}"#));
        assert!(message.contains("missing field"), "{}", message);
    }

    #[test]
    fn test_create_unknown_field() {
        let body = PIKACHU.replace("\"id\": 25,", "\"id\": 25, \"legendary\": false,");
        let message = validation_message(CreatePokemon::from_json(body.as_bytes()));
        assert!(message.contains("unknown field `legendary`"), "{}", message);
    }

    #[test]
    fn test_create_non_object_body() {
        validation_message(CreatePokemon::from_json(b"[1, 2, 3]"));
        validation_message(CreatePokemon::from_json(b""));
    }

    #[test]
    fn test_create_rule_violations() {
        let blank_name = PIKACHU.replace("\"Pikachu\"", "\"   \"");
        assert_eq!(
            validation_message(CreatePokemon::from_json(blank_name.as_bytes())),
            "name must contain at least one non-blank localized name"
        );

        let no_types = PIKACHU.replace("[\"Electric\"]", "[]");
        assert_eq!(
            validation_message(CreatePokemon::from_json(no_types.as_bytes())),
            "type must contain at least one entry"
        );

        let blank_type = PIKACHU.replace("[\"Electric\"]", "[\"Electric\", \"\"]");
        assert_eq!(
            validation_message(CreatePokemon::from_json(blank_type.as_bytes())),
            "type entries must not be blank"
        );

        let no_image = PIKACHU.replace("\"/assets/pokemons/025.png\"", "\"\"");
        assert_eq!(
            validation_message(CreatePokemon::from_json(no_image.as_bytes())),
            "image must not be blank"
        );
    }

    #[test]
    fn test_negative_stat_is_rejected() {
        let body = PIKACHU.replace("\"HP\": 35", "\"HP\": -1");
        validation_message(CreatePokemon::from_json(body.as_bytes()));
    }

    #[test]
    fn test_update_empty_body() {
        let update = UpdatePokemon::from_json(b"  \n").unwrap();
        assert!(update.is_empty());
        let update = UpdatePokemon::from_json(b"{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let mut pokemon = CreatePokemon::from_json(PIKACHU.as_bytes())
            .unwrap()
            .into_pokemon();
        let update = UpdatePokemon::from_json(
            br#"{"type": ["Electric", "Fairy"], "name": {"english": "Pikachu"}}"#,
        )
        .unwrap();

        update.apply_to(&mut pokemon).unwrap();
        assert_eq!(pokemon.types, ["Electric", "Fairy"]);
        assert_eq!(pokemon.name.english.as_deref(), Some("Pikachu"));
        assert_eq!(pokemon.name.french, None);
        assert_eq!(pokemon.base.hp, 35);
        assert_eq!(pokemon.image, "/assets/pokemons/025.png");
    }

    #[test]
    fn test_update_same_id_is_accepted() {
        let mut pokemon = CreatePokemon::from_json(PIKACHU.as_bytes())
            .unwrap()
            .into_pokemon();
        let update = UpdatePokemon::from_json(br#"{"id": 25, "image": "/x.png"}"#).unwrap();
        update.apply_to(&mut pokemon).unwrap();
        assert_eq!(pokemon.image, "/x.png");
    }

    #[test]
    fn test_update_cannot_change_id() {
        let mut pokemon = CreatePokemon::from_json(PIKACHU.as_bytes())
            .unwrap()
            .into_pokemon();
        let update = UpdatePokemon::from_json(br#"{"id": 26}"#).unwrap();
        assert_eq!(
            validation_message(update.apply_to(&mut pokemon)),
            "id cannot be changed (record 25 was given id 26)"
        );
        assert_eq!(pokemon.id, PokemonId::new(25));
    }

    #[test]
    fn test_update_invalid_fields() {
        validation_message(UpdatePokemon::from_json(br#"{"type": []}"#));
        validation_message(UpdatePokemon::from_json(br#"{"weight": 6}"#));
        validation_message(UpdatePokemon::from_json(br#"{"base": {"HP": 1}}"#));
    }
}
