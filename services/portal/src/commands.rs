//! Command line parsing and dispatch

use anyhow::{Result, anyhow, bail};
use booking::{BookingFlow, BookingPrefill, Sensitivity, SkinConcern, SkinTestFlow, SkinType};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use gateway::{Access, ApiClient, AppRoute, SessionState, guard};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "portal")]
#[command(about = "Book treatments and run the skin assessment from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Show the current session
    Status,
    /// Sign in
    Login { username: String, password: String },
    /// Sign out
    Logout,
    /// List treatments
    Services,
    /// List specialists
    Therapists,
    /// Book an appointment
    Book {
        service_id: u64,
        /// Day of the appointment, YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Start time, HH:MM
        #[arg(value_parser = parse_time)]
        time: NaiveTime,
        /// Preferred therapist
        therapist_id: Option<u64>,
    },
    /// Run the skin assessment
    SkinTest {
        #[arg(short = 't', long)]
        skin_type: SkinType,
        /// Comma separated, e.g. acne,enlarged-pores
        #[arg(short, long, value_delimiter = ',', required = true)]
        concerns: Vec<SkinConcern>,
        /// low, medium or high
        #[arg(short, long)]
        sensitivity: Sensitivity,
    },
    /// Check access to a page
    Route { path: String },
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}

/// Run a command against the backend
pub async fn run(command: Command, client: &ApiClient) -> Result<()> {
    info!("Running {:?}", command);

    match command {
        Command::Status => {
            let session = client.session().get_session()?;
            match session.state() {
                SessionState::Anonymous => println!("Not logged in"),
                SessionState::Authenticated { role, user_id } => println!(
                    "Logged in as {} (user {})",
                    role.map_or("unknown role".to_string(), |r| r.to_string()),
                    user_id.as_deref().unwrap_or("unknown")
                ),
            }
        }
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
        }
        Command::Logout => client.logout()?,
        Command::Services => {
            for service in client.services().await.into_result()? {
                println!(
                    "{:>4}  {:<32} {:>8.2}  {} min",
                    service.id, service.name, service.price, service.duration_minutes
                );
            }
        }
        Command::Therapists => {
            for therapist in client.therapists().await.into_result()? {
                println!(
                    "{:>4}  {:<32} {}",
                    therapist.id,
                    therapist.full_name(),
                    therapist.specialization
                );
            }
        }
        Command::Book {
            service_id,
            date,
            time,
            therapist_id,
        } => book(client, service_id, date, time, therapist_id).await?,
        Command::SkinTest {
            skin_type,
            concerns,
            sensitivity,
        } => skin_test(client, skin_type, concerns, sensitivity).await?,
        Command::Route { path } => {
            let route = AppRoute::parse(&path);
            let session = client.session().get_session()?;
            match guard(&route, &session) {
                Access::Allow => println!("{}: allowed", route),
                Access::Redirect(target) => println!("{}: redirected to {}", route, target),
            }
        }
    }

    Ok(())
}

async fn book(
    client: &ApiClient,
    service_id: u64,
    date: NaiveDate,
    time: NaiveTime,
    therapist_id: Option<u64>,
) -> Result<()> {
    let prefill = BookingPrefill {
        service_id: Some(service_id),
        therapist_id,
    };
    let mut flow = BookingFlow::start(client.clone(), Some(prefill))?;
    flow.load_catalog().await;

    if !flow.next() {
        bail!("Service {} cannot be booked", service_id);
    }

    let draft = flow.draft_mut()?;
    draft.set_date(date, Local::now().date_naive())?;
    draft.set_time_slot(time)?;
    if !flow.next() {
        bail!("Schedule incomplete");
    }

    let booking = flow.submit().await?;
    println!(
        "Booking #{} on {} ({:?})",
        booking.id, booking.appointment_time, booking.status
    );
    Ok(())
}

async fn skin_test(
    client: &ApiClient,
    skin_type: SkinType,
    concerns: Vec<SkinConcern>,
    sensitivity: Sensitivity,
) -> Result<()> {
    let mut flow = SkinTestFlow::start(client.clone())?;

    flow.draft_mut()?.skin_type = Some(skin_type);
    let draft = flow.draft_mut()?;
    for concern in concerns {
        draft.concerns.insert(concern);
    }
    draft.sensitivity = Some(sensitivity);

    while flow.wizard().current_step() < flow.wizard().total_steps() {
        if !flow.next() {
            return Err(anyhow!(
                "Skin assessment stopped at {}",
                flow.wizard().current_step_name()
            ));
        }
    }

    let services = flow.submit().await?;
    if services.is_empty() {
        println!("No specific recommendations");
    }
    for service in services {
        println!("{:>4}  {}", service.id, service.name);
    }
    Ok(())
}
