/* 📖 # Why use a separate file for these error tests?

Some of these tests set up a global tracing subscriber with the ErrorLayer so
span traces get captured. Keeping them apart from the error module means the
module itself stays readable and the subscriber setup lives in one place.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{PokedexError, PokedexResult, ResultExt};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    /// Set up tracing with ErrorLayer for tests.
    /// Uses `try_init()` to handle multiple tests running concurrently.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_error_from_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let path = PathBuf::from("pokedex.json");
        let error = PokedexError::new(ErrorKind::FileError {
            path: path.clone(),
            source: io_err,
        });

        match error.kind() {
            ErrorKind::FileError { path: p, .. } => assert_eq!(p, &path),
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_constructors_select_kind() {
        assert!(matches!(
            PokedexError::validation("bad body").kind(),
            ErrorKind::Validation { .. }
        ));
        assert!(matches!(
            PokedexError::not_found("Pokemon not found").kind(),
            ErrorKind::NotFound { .. }
        ));
        assert!(matches!(
            PokedexError::conflict("duplicate").kind(),
            ErrorKind::Conflict { .. }
        ));
        assert!(matches!(
            PokedexError::message("boom").kind(),
            ErrorKind::Message { .. }
        ));
    }

    #[test]
    fn test_error_context_attachment() {
        let error = PokedexError::message("original error")
            .context("first context")
            .context("second context");

        assert_eq!(error.get_context(), ["first context", "second context"]);
    }

    #[test]
    fn test_error_with_context_lazy_evaluation() {
        let mut called = false;
        let error = PokedexError::message("error").with_context(|| {
            called = true;
            "lazy context".to_string()
        });

        assert!(called);
        assert_eq!(error.get_context()[0], "lazy context");
    }

    #[test]
    fn test_error_display_message_only() {
        let error = PokedexError::validation("Missing required query parameter 'name'");
        assert_eq!(
            error.to_string(),
            "Missing required query parameter 'name'"
        );
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = PokedexError::message("root error")
            .context("first")
            .context("second")
            .context("third");
        assert_eq!(error.to_string(), "first: second: third: root error");
    }

    #[test]
    fn test_error_display_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let error = PokedexError::new(ErrorKind::FileError {
            path: PathBuf::from("/tmp/pokedex.json"),
            source: io_err,
        });
        let display = error.to_string();
        assert!(display.contains("/tmp/pokedex.json"));
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_error_display_multiple_errors() {
        let kind = ErrorKind::Multiple {
            errors: vec![
                PokedexError::message("error 1"),
                PokedexError::message("error 2"),
            ],
            count: 2,
        };
        let error = PokedexError::new(kind);
        assert_eq!(
            error.to_string(),
            "Multiple errors occurred (2 total): error 1"
        );
    }

    #[test]
    fn test_error_source_file_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = PokedexError::new(ErrorKind::FileError {
            path: PathBuf::from("test.txt"),
            source: io_err,
        });
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_source_message() {
        let error = PokedexError::message("test");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_source_is_cause() {
        let error = PokedexError::message("outer").caused_by(PokedexError::message("inner"));
        assert_eq!(error.source().unwrap().to_string(), "inner");
        assert_eq!(error.cause().unwrap().to_string(), "inner");
    }

    #[test]
    fn test_error_root_cause_follows_chain() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "disk gone");
        let inner = PokedexError::new(ErrorKind::FileError {
            path: PathBuf::from("pokedex.json"),
            source: io_err,
        });
        let error = PokedexError::message("could not persist").caused_by(inner);
        assert_eq!(error.root_cause().to_string(), "disk gone");
    }

    #[test]
    fn test_error_root_cause_message() {
        let error = PokedexError::message("test");
        assert_eq!(error.root_cause().to_string(), "test");
    }

    #[test]
    fn test_result_ext_context_success() {
        let result: PokedexResult<i32> = Ok(42);
        assert_eq!(result.context("operation failed").unwrap(), 42);
    }

    #[test]
    fn test_result_ext_chaining() {
        let result: PokedexResult<i32> = Err(Box::new(PokedexError::message("root")));
        let err = result
            .context("step 1")
            .context("step 2")
            .with_context(|| "step 3".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: step 3: root");
    }

    #[test]
    fn test_result_ext_keeps_kind() {
        let result: PokedexResult<()> = Err(Box::new(PokedexError::not_found("Pokemon not found")));
        let err = result.context("loading record 25").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotFound { .. }));
    }

    #[test]
    fn test_err_macro_formats_message() {
        fn fails() -> PokedexResult<()> {
            crate::bail!("port {} is taken", 3000);
        }
        let err = fails().unwrap_err();
        assert_eq!(err.to_string(), "port 3000 is taken");
        assert!(matches!(err.kind(), ErrorKind::Message { .. }));
    }

    #[test]
    fn test_debug_pretty_print_format() {
        let error = PokedexError::message("something went wrong")
            .context("while writing pokedex.json")
            .context("in create handler");

        expect![[r#"
            something went wrong
            ├─ while writing pokedex.json
            └─ in create handler
        "#]]
        .assert_eq(&format!("{:?}", error));
    }

    #[test]
    fn test_debug_nested_errors() {
        let inner_error = PokedexError::message("inner error").context("inner context");
        let outer_error = PokedexError::message("outer error")
            .context("outer context")
            .caused_by(inner_error);

        expect![[r#"
            outer error
            ├─ outer context
            └─ cause: inner error
               └─ inner context
        "#]]
        .assert_eq(&format!("{:?}", outer_error));
    }

    #[test]
    fn test_debug_multiple_nested_errors() {
        let error_1 = PokedexError::message("error 1").context("context 1");
        let error_2 = PokedexError::message("error 2")
            .context("context 2")
            .caused_by(error_1);
        let error_3 = PokedexError::message("error 3")
            .context("context 3")
            .caused_by(error_2);

        expect![[r#"
            error 3
            ├─ context 3
            └─ cause: error 2
               ├─ context 2
               └─ cause: error 1
                  └─ context 1
        "#]]
        .assert_eq(&format!("{:?}", error_3));
    }

    #[test]
    fn test_spantrace_included_inside_span() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "store_insert", pokemon_id = 25);
        let _guard = operation_span.enter();

        let error = PokedexError::conflict("Pokemon with id 25 already exists");
        let debug = format!("{:?}", error);

        assert!(debug.starts_with("Pokemon with id 25 already exists\n"));
        assert!(debug.contains("Trace:"));
        assert!(debug.contains("store_insert"));
        assert!(debug.contains("pokemon_id=25"));
    }
}
