/* 📖 # Why is the CLI minimal and hardcoded?

There is no argument parsing. `pokedex` runs in a directory, reads
`pokedex.toml` from it if present, seeds the store from the configured data
file, and serves the API until the process is stopped. The only outside input
besides the config file is the `PORT` environment variable.

Exit codes:
- 0: never returned while serving
- 1: startup failed (bad config, unreadable seed data, port in use)
*/

use std::env;
use std::process;

use tracing::info;

use pokedex_base::tracing::init_tracing;
use pokedex_base::{FilePath, PalHandle, RealPal};
use pokedex_engine::{ApiService, CONFIG_FILE, load_config, open_store};

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    let config = match load_config(&pal, &FilePath::from(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config from {}: {}", CONFIG_FILE, e);
            process::exit(1);
        }
    };

    let store = match open_store(&pal, &config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to load {}: {}", config.data_file(), e);
            process::exit(1);
        }
    };

    let count = store.len().unwrap_or_default();
    let service = ApiService::from_config(store, pal.clone(), &config);
    let handle = match pal.start_http_server(Box::new(service), config.http_server_config()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: Failed to start server: {}", e);
            process::exit(1);
        }
    };

    info!(address = %handle.address(&config.host), count, "server started");
    println!("Serving {} Pokémon on {}", count, config.public_url());
    println!("API documentation: {}/api-docs", config.public_url());

    handle.wait();
}
