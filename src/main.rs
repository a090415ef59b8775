use anyhow::Result;
use clap::{Parser, Subcommand};
use exammaster::session::CredentialStore;
use exammaster::{ApiClient, Config, CourseStore, SessionStore, code};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "exammaster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate access codes for distribution
    Generate {
        /// Number of codes to generate
        count: u32,
        /// Starting index (0-99999)
        #[arg(short, long, default_value_t = 0)]
        start: u32,
        /// Prefix letter (A-Z)
        #[arg(short, long, default_value_t = 'T')]
        prefix: char,
    },
    /// Check a code's format and checksum locally
    Verify {
        /// Access code, e.g. T00010-8AB
        code: String,
    },
    /// Verify a code against the backend and sign in
    Login {
        /// Access code, e.g. T00010-8AB
        code: String,
    },
    /// Clear the persisted session
    Logout,
    /// Fetch and print the lesson manifest
    Lessons,
    /// Fetch the signed-in user's course progress
    Progress,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exammaster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Generate { count, start, prefix } => generate(&config, count, start, prefix),
        Commands::Verify { code } => verify(&config, &code),
        Commands::Login { code } => login(&config, &code).await,
        Commands::Logout => logout(),
        Commands::Lessons => lessons(&config).await,
        Commands::Progress => progress(&config).await,
    }
}

/// Emit `index<TAB>code` lines for a range of indexes
fn generate(config: &Config, count: u32, start: u32, prefix: char) -> Result<()> {
    if count == 0 {
        anyhow::bail!("count must be a positive integer");
    }
    if !prefix.is_ascii_alphabetic() {
        anyhow::bail!("prefix must be a single letter A-Z");
    }
    if start > 99_999 {
        anyhow::bail!("start must be between 0 and 99999 inclusive");
    }
    if u64::from(start) + u64::from(count) - 1 > 99_999 {
        anyhow::bail!("start + count - 1 must not exceed 99999");
    }

    let prefix = prefix.to_ascii_uppercase();
    for index in start..start + count {
        println!("{}\t{}", index, code::generate(prefix, index, &config.code_salt));
    }

    Ok(())
}

/// Local format + checksum check; exit code reflects the verdict
fn verify(config: &Config, raw: &str) -> Result<()> {
    let code = code::normalize_input(raw);

    if !code::verify_format(&code) {
        anyhow::bail!("Code format must be like T00010-8AB");
    }
    if !code::verify_checksum(&code, &config.code_salt) {
        anyhow::bail!("Checksum mismatch for {}", code);
    }

    println!("{} is valid", code);
    Ok(())
}

/// Verify a code against the backend and persist the session
async fn login(config: &Config, raw: &str) -> Result<()> {
    let client = ApiClient::new(config.api.clone());
    let mut session = SessionStore::new(CredentialStore::open_default()?);

    // A restored session may have expired while we were away.
    if session.token().is_some() {
        session.check_stored_session(&client).await;
        if session.is_authenticated() {
            let name = session.user().map(|u| u.name.clone()).unwrap_or_default();
            println!("Already signed in as {}", name);
            return Ok(());
        }
    }

    let code = code::normalize_input(raw);
    if session.verify_code(&client, &code).await? {
        let name = session.user().map(|u| u.name.clone()).unwrap_or_default();
        println!("Signed in as {}", name);
        Ok(())
    } else {
        anyhow::bail!("Verification failed. Please check your code and try again.");
    }
}

/// Clear the persisted session
fn logout() -> Result<()> {
    let mut session = SessionStore::new(CredentialStore::open_default()?);
    session.logout();
    println!("Signed out");
    Ok(())
}

/// Fetch and print the lesson manifest
async fn lessons(config: &Config) -> Result<()> {
    let client = ApiClient::new(config.api.clone());
    let mut store = CourseStore::new();

    let lessons = store.fetch_lessons(&client).await?;
    if lessons.is_empty() {
        println!("No lessons published");
        return Ok(());
    }

    for lesson in lessons {
        let tags = if lesson.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", lesson.tags.join(", "))
        };
        println!("{:>4}  {} ({} min){}", lesson.id, lesson.name, lesson.duration_minutes(), tags);
    }

    Ok(())
}

/// Fetch and print the signed-in user's progress rows
async fn progress(config: &Config) -> Result<()> {
    let client = ApiClient::new(config.api.clone());
    let session = SessionStore::new(CredentialStore::open_default()?);

    if !session.is_authenticated() {
        anyhow::bail!("Not signed in. Run `exammaster login <code>` first.");
    }

    let rows = client.fetch_progress(session.token()).await?;
    if rows.is_empty() {
        println!("No progress recorded yet");
        return Ok(());
    }

    for row in rows {
        println!(
            "course {:>4}: watched {:>3}%  answered {:>3}  correct {:>3}",
            row.course_id,
            row.progress_percent.unwrap_or(0),
            row.total_answered.unwrap_or(0),
            row.total_correct.unwrap_or(0),
        );
    }

    Ok(())
}
