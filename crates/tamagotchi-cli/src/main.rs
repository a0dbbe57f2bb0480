use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use tamagotchi_core::export::{history_to_json, write_history_csv, DISPLAY_DATE_FORMAT};
use tamagotchi_core::models::{Pet, Species};
use tamagotchi_core::{Database, Keeper, PortraitTable, Rates, TamagotchiError};

#[derive(Parser)]
#[command(name = "tamagotchi", version, about = "Virtual pet keeper")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, default_value = "tamagotchi.db")]
    db: String,

    /// JSON file overriding the bundled decay rates
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Directory holding species portrait images
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Chat user ID the command is issued for
    #[arg(long, short)]
    user: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adopt a new pet
    Create {
        /// Pet name
        name: String,
        /// One of: rabbit, owl, hedgehog, monkey
        species: String,
    },
    /// Show the pet's current stats
    Status,
    /// Feed the pet
    Feed,
    /// Play with the pet
    Play,
    /// List pets that have died
    History {
        #[arg(long, value_enum, default_value_t = HistoryFormat::Table)]
        format: HistoryFormat,
    },
    /// List the species that can be adopted
    Species,
}

#[derive(Clone, Copy, ValueEnum)]
enum HistoryFormat {
    Table,
    Csv,
    Json,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> tamagotchi_core::Result<()> {
    if let Commands::Species = cli.command {
        return cmd_species();
    }

    let user_id = require_user(&cli);
    let keeper = open_keeper(&cli)?;
    let portraits = PortraitTable::load(&cli.assets);

    let result = match &cli.command {
        Commands::Create { name, species } => cmd_create(&keeper, &portraits, user_id, name, species),
        Commands::Status => cmd_status(&keeper, &portraits, user_id),
        Commands::Feed => cmd_feed(&keeper, user_id),
        Commands::Play => cmd_play(&keeper, user_id),
        Commands::History { format } => cmd_history(&keeper, user_id, *format),
        Commands::Species => unreachable!("species is answered before opening the database"),
    };

    // Validation and missing-pet errors are answers, not failures.
    match result {
        Err(e) if e.is_user_error() => {
            println!("{}", user_message(&e));
            Ok(())
        }
        other => other,
    }
}

fn require_user(cli: &Cli) -> i64 {
    match cli.user {
        Some(id) => id,
        None => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--user <USER> is required for this command",
            )
            .exit(),
    }
}

fn open_keeper(cli: &Cli) -> tamagotchi_core::Result<Keeper> {
    let db = Database::open(&cli.db)?;
    log::debug!("Opened {} with {} live pets", cli.db, db.live_pet_count()?);
    let rates = match &cli.rates {
        Some(path) => Rates::from_file(path)?,
        None => Rates::bundled()?,
    };
    Ok(Keeper::new(db, rates))
}

fn user_message(e: &TamagotchiError) -> String {
    match e {
        TamagotchiError::UnknownSpecies(given) => format!(
            "'{}' is not a pet we have. Pick one of: {}.",
            given,
            species_list()
        ),
        TamagotchiError::PetAlreadyExists { name, .. } => format!(
            "You already have a pet named {}!\n\
             Use 'status' to check on it or 'play' to play with it.",
            name
        ),
        TamagotchiError::InvalidName => "Please give your pet a name.".to_string(),
        TamagotchiError::NoLivePet(_) => {
            "You don't have a living pet. Use 'create' to adopt a new one.".to_string()
        }
        other => other.to_string(),
    }
}

fn species_list() -> String {
    Species::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_portrait(portraits: &PortraitTable, species: Species) {
    if let Some(path) = portraits.get(species) {
        println!("[portrait: {}]", path.display());
    }
}

fn cmd_create(
    keeper: &Keeper,
    portraits: &PortraitTable,
    user_id: i64,
    name: &str,
    species: &str,
) -> tamagotchi_core::Result<()> {
    let (pet, had_pets) = adopt(keeper, user_id, name, species, tamagotchi_core::keeper::now())?;

    print_portrait(portraits, pet.species);
    if had_pets {
        println!("Your previous pet is remembered in your history.");
    }
    println!(
        "Congratulations! You adopted a new {} named {}!",
        pet.species, pet.name
    );
    println!("Use 'feed' to feed it, 'play' to play with it, 'status' to check on it.");
    Ok(())
}

/// Create the pet and report whether the user has lost one before.
fn adopt(
    keeper: &Keeper,
    user_id: i64,
    name: &str,
    species: &str,
    now: NaiveDateTime,
) -> tamagotchi_core::Result<(Pet, bool)> {
    let pet = keeper.create_at(user_id, name, species, now)?;
    // create may have archived a pet that starved unobserved
    let had_pets = !keeper.get_history(user_id)?.is_empty();
    Ok((pet, had_pets))
}

fn cmd_status(keeper: &Keeper, portraits: &PortraitTable, user_id: i64) -> tamagotchi_core::Result<()> {
    if let Some(pet) = keeper.get_live_status(user_id)? {
        print_portrait(portraits, pet.species);
        print_pet(&pet);
        return Ok(());
    }

    match keeper.last_death(user_id)? {
        Some(last) => {
            println!("Your pet {} ({}) died...", last.name, last.species);
            println!("It lived: {}", last.lifespan_display());
            println!("Use 'create' to adopt a new pet or 'history' to see past pets.");
        }
        None => println!("You don't have a pet yet. Use 'create' to adopt one."),
    }
    Ok(())
}

fn print_pet(pet: &Pet) {
    println!("Name:      {} ({})", pet.name, pet.species);
    println!("Hunger:    {}/100", pet.hunger);
    println!("Happiness: {}/100", pet.happiness);
    println!("Health:    {}/100", pet.health);
    println!("Condition: {}", pet.health_status());
}

fn cmd_feed(keeper: &Keeper, user_id: i64) -> tamagotchi_core::Result<()> {
    let pet = keeper.feed(user_id)?;
    println!(
        "You fed {} ({})! 🍔 (+{} health)",
        pet.name,
        pet.species,
        keeper.rates().health_feed_benefit
    );
    Ok(())
}

fn cmd_play(keeper: &Keeper, user_id: i64) -> tamagotchi_core::Result<()> {
    let outcome = keeper.play(user_id)?;
    println!(
        "You played {} with {} ({})! 🎾 (+{} health)",
        outcome.activity,
        outcome.pet.name,
        outcome.pet.species,
        keeper.rates().health_play_benefit
    );
    Ok(())
}

fn cmd_history(keeper: &Keeper, user_id: i64, format: HistoryFormat) -> tamagotchi_core::Result<()> {
    let history = keeper.get_history(user_id)?;

    match format {
        HistoryFormat::Csv => return write_history_csv(&history, std::io::stdout()),
        HistoryFormat::Json => {
            println!("{}", history_to_json(&history)?);
            return Ok(());
        }
        HistoryFormat::Table => {}
    }

    if history.is_empty() {
        println!("You haven't had any pets yet. Use 'create' to adopt your first one.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Name", "Species", "Born", "Died", "Lived"]);

    for (i, h) in history.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            h.name.clone(),
            h.species.to_string(),
            h.created_at.format(DISPLAY_DATE_FORMAT).to_string(),
            h.died_at.format(DISPLAY_DATE_FORMAT).to_string(),
            h.lifespan_display(),
        ]);
    }

    println!("Your pets ({}):", history.len());
    println!("{table}");
    Ok(())
}

fn cmd_species() -> tamagotchi_core::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Species", "Also accepted as", "Portrait file"]);

    for sp in Species::ALL {
        table.add_row(vec![
            sp.as_str(),
            sp.legacy_label(),
            PortraitTable::file_name(sp),
        ]);
    }

    println!("{table}");
    Ok(())
}
