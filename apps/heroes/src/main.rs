use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    HeroSearch, HeroService, HttpHeroApi, MessageService, SearchResults, DASHBOARD_SIZE,
};
use shared::domain::{Hero, HeroId, NewHero};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{load_settings, CliSettings, SETTINGS_FILE};

#[derive(Parser, Debug)]
#[command(name = "heroes", about = "Tour of Heroes client")]
struct Args {
    /// Hero API base url; overrides heroes.toml and HEROES_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Search debounce window in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    /// Print the service message log after the command.
    #[arg(long)]
    messages: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every hero.
    List,
    /// Show one hero.
    Get { id: i64 },
    /// Create a hero.
    Add { name: String },
    /// Rename a hero.
    Rename { id: i64, name: String },
    /// Delete a hero.
    Delete { id: i64 },
    /// Dashboard heroes.
    Top {
        #[arg(default_value_t = DASHBOARD_SIZE)]
        count: usize,
    },
    /// Live search: one term per stdin line.
    Search,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config, None)?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        settings.debounce_ms = debounce_ms;
    }
    debug!(?settings, "settings loaded");

    let api = HttpHeroApi::with_timeout(&settings.api_url, settings.request_timeout())?;
    let messages = Arc::new(MessageService::new());
    let service = HeroService::new(Arc::new(api), messages.clone());

    let outcome = run(args.command, &service, &settings).await;

    if args.messages {
        eprintln!("-- messages --");
        for entry in messages.entries() {
            eprintln!("{} {}", entry.at.format("%H:%M:%S%.3f"), entry.text);
        }
    }
    outcome
}

async fn run(command: Command, service: &HeroService, settings: &CliSettings) -> Result<()> {
    match command {
        Command::List => print_heroes(&service.get_heroes().await),
        Command::Top { count } => print_heroes(&service.top_heroes(count).await),
        Command::Get { id } => match service.get_hero(HeroId(id)).await {
            Some(hero) => print_hero(&hero),
            None => bail!("hero {id} not found"),
        },
        Command::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("hero name cannot be empty");
            }
            match service.add_hero(NewHero::new(name)).await {
                Some(hero) => print_hero(&hero),
                None => bail!("hero was not created"),
            }
        }
        Command::Rename { id, name } => {
            let Some(hero) = service.get_hero(HeroId(id)).await else {
                bail!("hero {id} not found");
            };
            let renamed = hero.renamed(name.trim());
            if service.update_hero(&renamed).await.is_none() {
                bail!("hero {id} was not updated");
            }
            print_hero(&renamed);
        }
        Command::Delete { id } => {
            let removed = service.delete_hero(HeroId(id)).await;
            if let Some(hero) = removed {
                println!("deleted {}", hero.name);
            }
        }
        Command::Search => {
            let (terms, results) = HeroSearch::new(service.clone())
                .debounce(settings.debounce())
                .spawn();
            let printer = tokio::spawn(print_batches(results));

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                terms.search(line);
            }
            drop(terms);
            printer.await?;
        }
    }
    Ok(())
}

async fn print_batches(mut results: SearchResults) {
    while let Some(batch) = results.next_batch().await {
        if batch.is_empty() {
            println!("(no heroes)");
            continue;
        }
        let names: Vec<&str> = batch.iter().map(|hero| hero.name.as_str()).collect();
        println!("{}", names.join(", "));
    }
}

fn print_heroes(heroes: &[Hero]) {
    for hero in heroes {
        print_hero(hero);
    }
}

fn print_hero(hero: &Hero) {
    println!("{:>4}  {}", hero.id, hero.name);
}
