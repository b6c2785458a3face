use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use reflect_cli::seeder::{SeedConfig, clear_all, seed_all};
use reflect_cli::{NewAdmin, create_admin};
use reflect_db::{DatabaseConfig, PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "reflect-cli")]
#[command(about = "Reflect CLI - Administrative tools for the Reflect blog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Given name
        #[arg(short = 'g', long)]
        given_name: Option<String>,

        /// Family name
        #[arg(short = 'f', long)]
        family_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users, categories and articles
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "20")]
        users: usize,

        /// Number of categories to create
        #[arg(short = 'c', long, default_value = "5")]
        categories: usize,

        /// Number of articles to create
        #[arg(short = 'a', long, default_value = "100")]
        articles: usize,
    },
    /// Clear seeded users and their articles (keeps categories)
    ClearSeed,
    /// Apply pending database migrations
    Migrate,
}

fn prompt(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            given_name,
            family_name,
            password,
        } => handle_create_admin(&pool, username, email, given_name, family_name, password).await,
        Commands::Seed {
            users,
            categories,
            articles,
        } => handle_seed(&pool, SeedConfig::new(users, categories, articles)).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = prompt("Username", username)?;
    let email = prompt("Email address", email)?;
    let given_name = prompt("Given name", given_name)?;
    let family_name = prompt("Family name", family_name)?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let admin = NewAdmin {
        username: &username,
        email: &email,
        given_name: &given_name,
        family_name: &family_name,
        password: &password,
    };

    match create_admin(pool, admin).await {
        Ok(id) => {
            println!("\n✅ Administrator created successfully!");
            println!("   Id: {}", id);
            println!("   Username: {}", username);
            println!("   Name: {} {}", given_name, family_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    match seed_all(pool, config).await {
        Ok(summary) => {
            println!(
                "   Created {} users, {} categories, {} articles",
                summary.users, summary.categories, summary.articles
            );
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn handle_clear_seed(pool: &PgPool) -> anyhow::Result<()> {
    match clear_all(pool).await {
        Ok((users, articles)) => {
            println!("✅ Removed {} seeded users and {} articles", users, articles);
        }
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
