//! Sample records shared by the engine's unit tests.

use crate::pokemon::{BaseStats, Pokemon, PokemonId, PokemonName};

pub fn pikachu() -> Pokemon {
    Pokemon {
        id: PokemonId::new(25),
        name: PokemonName {
            english: Some("Pikachu".to_string()),
            french: Some("Pikachu".to_string()),
            japanese: Some("ピカチュウ".to_string()),
            chinese: Some("皮卡丘".to_string()),
        },
        types: vec!["Electric".to_string()],
        base: BaseStats {
            hp: 35,
            attack: 55,
            defense: 40,
            special_attack: 50,
            special_defense: 50,
            speed: 90,
        },
        image: "/assets/pokemons/025.png".to_string(),
    }
}

pub fn bulbasaur() -> Pokemon {
    Pokemon {
        id: PokemonId::new(1),
        name: PokemonName {
            english: Some("Bulbasaur".to_string()),
            french: Some("Bulbizarre".to_string()),
            japanese: Some("フシギダネ".to_string()),
            chinese: Some("妙蛙种子".to_string()),
        },
        types: vec!["Grass".to_string(), "Poison".to_string()],
        base: BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            special_attack: 65,
            special_defense: 65,
            speed: 45,
        },
        image: "/assets/pokemons/001.png".to_string(),
    }
}

/// A minimal record with a generated english name (`Mon 7`).
pub fn numbered(id: i64) -> Pokemon {
    Pokemon {
        id: PokemonId::new(id),
        name: PokemonName {
            english: Some(format!("Mon {}", id)),
            ..PokemonName::default()
        },
        types: vec!["Normal".to_string()],
        base: BaseStats::default(),
        image: format!("/assets/pokemons/{:03}.png", id),
    }
}
