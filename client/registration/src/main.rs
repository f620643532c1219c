//! `hackforge-register` — submit a HackForge 2.0 team registration from the
//! command line.
//!
//! Reads the form from a JSON file, attaches the payment receipt, validates
//! everything locally and posts it to `BACKEND_URL`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hackforge_registration::catalog::{EVENT_NAME, FEE_PER_MEMBER, TEAM_SIZE_OPTIONS, TRACKS, YEARS};
use hackforge_registration::{
    Config, DraftField, HttpTransport, LogNotifier, MemberField, PreviewRegistry, ReceiptFile,
    RegistrationController, SubmitReport, TeamMember, TeamSize,
};

#[derive(Debug, Parser)]
#[command(name = "hackforge-register", version, about = "Register a team for HackForge 2.0")]
struct Cli {
    /// JSON file with the registration form
    #[arg(long, required_unless_present = "options")]
    draft: Option<PathBuf>,

    /// Payment receipt (JPG, JPEG or PDF)
    #[arg(long)]
    receipt: Option<PathBuf>,

    /// Validate only; nothing is sent
    #[arg(long)]
    dry_run: bool,

    /// Print the selectable tracks, years and team sizes, then exit
    #[arg(long)]
    options: bool,
}

/// On-disk form, keyed like the multipart fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DraftFile {
    name: String,
    email: String,
    phone: String,
    year: String,
    team_name: String,
    track: String,
    /// Out-of-range sizes are rejected while parsing.
    team_size: Option<TeamSize>,
    team_members: Vec<TeamMember>,
    upi_id: String,
    transaction_id: String,
}

impl DraftFile {
    fn apply(self, form: &mut RegistrationController<LogNotifier>) {
        form.set_field(DraftField::LeaderName, self.name);
        form.set_field(DraftField::Email, self.email);
        form.set_field(DraftField::Phone, self.phone);
        form.set_field(DraftField::Year, self.year);
        form.set_field(DraftField::TeamName, self.team_name);
        form.set_field(DraftField::Track, self.track);
        match self.team_size {
            Some(size) => form.set_team_size(size.get() as i64),
            None => form.set_team_size(self.team_members.len() as i64),
        };
        for (i, member) in self.team_members.into_iter().enumerate() {
            form.set_member_field(i, MemberField::Name, member.name);
            form.set_member_field(i, MemberField::RollNumber, member.roll_number);
            form.set_member_field(i, MemberField::Program, member.program);
        }
        form.set_upi_id(self.upi_id);
        form.set_transaction_id(self.transaction_id);
    }
}

fn print_options() {
    println!("{EVENT_NAME} — {FEE_PER_MEMBER} INR per member");
    println!("Tracks:");
    for track in TRACKS {
        println!("  {track}");
    }
    println!("Years:");
    for year in YEARS {
        println!("  {year}");
    }
    let sizes: Vec<String> = TEAM_SIZE_OPTIONS.iter().map(u8::to_string).collect();
    println!("Team sizes: {}", sizes.join(", "));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if cli.options {
        print_options();
        return Ok(());
    }

    // Backend settings are only needed when something is sent.
    let config = if cli.dry_run {
        None
    } else {
        Some(Config::from_env()?)
    };
    let community_link = config
        .as_ref()
        .map(|c| c.community_link.clone())
        .unwrap_or_default();

    let mut form = RegistrationController::new(
        Arc::new(PreviewRegistry::new()),
        LogNotifier,
        community_link,
    );

    if let Some(path) = &cli.draft {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let draft: DraftFile =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        draft.apply(&mut form);
    }

    if let Some(path) = &cli.receipt {
        let receipt = ReceiptFile::from_path(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        form.attach(receipt)?;
    }

    info!(
        "team of {}, total fee {} INR",
        form.draft().team_size().get(),
        form.total_fee()
    );

    let Some(config) = config else {
        let failures = form.validation_errors();
        if failures.is_empty() {
            info!("registration is complete and ready to submit");
            return Ok(());
        }
        for failure in &failures {
            warn!("{failure}");
        }
        anyhow::bail!("{} validation problem(s)", failures.len());
    };

    let transport = HttpTransport::from_config(&config)?;
    info!("submitting to {}", transport.endpoint());

    match form.submit(&transport).await? {
        SubmitReport::Registered { community_link } => {
            println!("Registered for {EVENT_NAME}! Join the community: {community_link}");
            Ok(())
        }
        SubmitReport::Failed { reason } => anyhow::bail!(reason),
    }
}
