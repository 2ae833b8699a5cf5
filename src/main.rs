use clap::Parser;
use pet_catalog::utils::{logger, validation::Validate};
use pet_catalog::{build_session, CliConfig, ConfigProvider, Pet, PetError, PetSession, TomlConfig};

fn print_listing(session: &PetSession, pets: &[Pet]) {
    if pets.is_empty() {
        println!("No pets match the current filters.");
        return;
    }

    for pet in pets {
        let star = if session.is_favorite(pet.id()) { "★" } else { "☆" };
        println!(
            "{} {} {:<24} {} · {} · {} · {} yrs  [{}]",
            star,
            pet.species().icon(),
            pet.name(),
            pet.species(),
            pet.size(),
            pet.gender(),
            pet.age(),
            pet.id()
        );
    }
}

async fn run<C: ConfigProvider + Validate>(provider_config: &C, cli: &CliConfig) -> Result<(), PetError> {
    provider_config.validate()?;

    let session = build_session(provider_config)?;
    let snapshot = session.refresh().await?;
    if snapshot.is_partial() {
        tracing::warn!(
            "⚠️ Some providers failed: {}",
            snapshot.failed_providers().join(", ")
        );
    }

    for id in &cli.favorites {
        let now_favorite = session.toggle(id);
        if !snapshot.contains(id) {
            tracing::warn!("⚠️ '{}' is not in the current catalog", id);
        }
        tracing::debug!("Toggled '{}' -> {}", id, now_favorite);
    }

    if let Some(id) = &cli.share {
        match snapshot.get(id) {
            Some(pet) => println!("{}", pet.share_message()),
            None => tracing::warn!("⚠️ Cannot share '{}': not in the current catalog", id),
        }
        return Ok(());
    }

    let pets = session.apply(&cli.filter_state());
    let favorites = session.list();

    if cli.json {
        let output = serde_json::json!({
            "fetchedAt": snapshot.fetched_at(),
            "failedProviders": snapshot.failed_providers(),
            "pets": pets,
            "favorites": favorites,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("🐾 Find Your Perfect Pet ({} of {})", pets.len(), snapshot.len());
    print_listing(&session, &pets);

    if !favorites.is_empty() {
        println!();
        println!("💛 My Fav Pets");
        for pet in &favorites {
            println!("  {} {} [{}]", pet.species().icon(), pet.name(), pet.id());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pet-catalog CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(toml_config) => run(&toml_config, &cli).await,
            Err(e) => Err(e),
        },
        None => run(&cli, &cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ pet-catalog failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
