use clap::Parser;
use color_eyre::Result;
use thinkboard::{cache::LOG_FILE, logging, run, AppConfig, Args, RunOptions};

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        match thinkboard::ConfigManager::new(thinkboard::APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.clear_cache {
        match thinkboard::CacheManager::new(thinkboard::APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    Ok(None)
}

fn init_logging(args: &Args) {
    let path = match &args.log_file {
        Some(path) => path.clone(),
        None => match thinkboard::CacheManager::new(thinkboard::APP_NAME) {
            Ok(cache) => cache.cache_file(LOG_FILE),
            Err(_) => return,
        },
    };
    // the terminal belongs to the UI; a log we cannot open is skipped
    if let Err(e) = logging::init(&path) {
        eprintln!("Warning: logging disabled ({}): {}", path.display(), e);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    init_logging(&args);

    let mut config = match AppConfig::load(thinkboard::APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: using default configuration: {}", e);
            AppConfig::default()
        }
    };
    config.apply_args(&args);

    if let Err(e) = run(RunOptions::from(&args), config) {
        log::error!("app.crash err={:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
