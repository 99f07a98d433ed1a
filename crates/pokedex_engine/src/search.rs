/* 📖 # Why escape the query before building a regex?

Search is a case-insensitive substring match over the four localized names.
The caller's text is escaped with `regex::escape` before compiling, so a query
like `.` or `(a+)+` matches those characters literally instead of being
interpreted as a pattern. The regex crate guarantees linear-time matching, and
its case folding handles non-ASCII names ("é", "Ü") where a plain
`to_lowercase().contains()` comparison is easy to get subtly wrong.
*/

use regex::{Regex, RegexBuilder};

use pokedex_base::{PokedexError, PokedexResult, err};

use crate::pokemon::Pokemon;

/// A compiled name search.
#[derive(Debug, Clone)]
pub struct NameSearch {
    query: String,
    pattern: Regex,
}

impl NameSearch {
    /// Compile a search for `query`. Blank queries are rejected.
    ///
    /// ```
    /// use pokedex_engine::search::NameSearch;
    ///
    /// let search = NameSearch::new("bulb").unwrap();
    /// assert!(search.matches_text("Bulbizarre"));
    /// assert!(!search.matches_text("Pikachu"));
    /// ```
    pub fn new(query: &str) -> PokedexResult<Self> {
        if query.trim().is_empty() {
            return Err(Box::new(PokedexError::validation(
                "search query must not be blank",
            )));
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| err!("Failed to compile search for '{}': {}", query, e))?;
        Ok(Self {
            query: query.to_string(),
            pattern,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// True when any localized name of `pokemon` contains the query.
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        pokemon.name.localized().any(|name| self.matches_text(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::{BaseStats, PokemonId, PokemonName};

    fn create_test_pokemon(english: &str, french: &str, japanese: &str) -> Pokemon {
        Pokemon {
            id: PokemonId::new(1),
            name: PokemonName {
                english: Some(english.to_string()),
                french: Some(french.to_string()),
                japanese: Some(japanese.to_string()),
                chinese: None,
            },
            types: vec!["Normal".to_string()],
            base: BaseStats::default(),
            image: "/assets/pokemons/001.png".to_string(),
        }
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(NameSearch::new("").is_err());
        assert!(NameSearch::new("   ").is_err());
    }

    #[test]
    fn test_matches_any_language() {
        let bulbasaur = create_test_pokemon("Bulbasaur", "Bulbizarre", "フシギダネ");
        assert!(NameSearch::new("saur").unwrap().matches(&bulbasaur));
        assert!(NameSearch::new("izar").unwrap().matches(&bulbasaur));
        assert!(NameSearch::new("ギダ").unwrap().matches(&bulbasaur));
        assert!(!NameSearch::new("chu").unwrap().matches(&bulbasaur));
    }

    #[test]
    fn test_case_insensitive() {
        let search = NameSearch::new("BULB").unwrap();
        assert!(search.matches_text("Bulbizarre"));
        assert!(NameSearch::new("flabébé").unwrap().matches_text("FLABÉBÉ"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let mr_mime = create_test_pokemon("Mr. Mime", "M. Mime", "バリヤード");
        let pikachu = create_test_pokemon("Pikachu", "Pikachu", "ピカチュウ");

        let dot = NameSearch::new(".").unwrap();
        assert!(dot.matches(&mr_mime));
        assert!(!dot.matches(&pikachu));

        let group = NameSearch::new("(a+)+").unwrap();
        assert!(!group.matches(&pikachu));
        assert_eq!(group.query(), "(a+)+");
    }

    #[test]
    fn test_missing_names_never_match() {
        let mut pokemon = create_test_pokemon("Eevee", "Évoli", "イーブイ");
        pokemon.name = PokemonName::default();
        assert!(!NameSearch::new("e").unwrap().matches(&pokemon));
    }
}
