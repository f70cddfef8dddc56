use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use tracing::info;

use crate::clients::supabase_client::{CalendarStore, SupabaseClient};
use crate::config::Settings;
use crate::handlers::terminal::{render_day, render_month};
use crate::models::color::Rgba;
use crate::service::auth_service::{AuthService, forget, logged_in_user};
use crate::service::calendar_service::{AppState, CalendarService};
use crate::service::grid::YearMonth;

#[derive(Parser)]
#[command(about = "Month calendar backed by a hosted table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month (defaults to the current one)
    Show {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Show the month after the given one
    Next {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Show the month before the given one
    Prev {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    Day {
        date: NaiveDate,
    },
    /// Save the text of a day, optionally with its own color
    Set {
        date: NaiveDate,
        text: String,
        #[arg(long)]
        color: Option<Rgba>,
    },
    /// Add another entry to a day without touching the existing ones
    Add {
        date: NaiveDate,
        text: String,
        #[arg(long)]
        color: Option<Rgba>,
    },
    Color {
        date: NaiveDate,
        color: Rgba,
    },
    ClearColor {
        date: NaiveDate,
    },
    GlobalColor {
        color: Rgba,
    },
    Login,
    Logout,
}

pub async fn cli(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    // Fine to panic here
    let cli = Cli::parse();
    let store = SupabaseClient::new(settings.supabase.clone());

    match &cli.command {
        Commands::Login => {
            let username = prompt_login(&settings, &store).await?;
            println!("Logged in as {}", username);
            return Ok(());
        }
        Commands::Logout => {
            forget(&settings.login_file)?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    let username = match logged_in_user(&settings.login_file, Utc::now()) {
        Some(username) => username,
        None => prompt_login(&settings, &store).await?,
    };

    let today = settings.today();
    let service = CalendarService::new(store);
    let mut state = AppState::new(&username, YearMonth::from_date(today));
    service.load_global_color(&mut state).await;
    service.refresh(&mut state).await;

    match &cli.command {
        Commands::Show { year, month } => {
            state.cursor = target_month(*year, *month, today)?;
        }
        Commands::Next { year, month } => {
            state.cursor = target_month(*year, *month, today)?;
            service.navigate_next(&mut state);
        }
        Commands::Prev { year, month } => {
            state.cursor = target_month(*year, *month, today)?;
            service.navigate_previous(&mut state);
        }
        Commands::Day { date } => {
            print!("{}", render_day(&service.day_detail(&state, *date)));
            return Ok(());
        }
        Commands::Set { date, text, color } => {
            state.cursor = YearMonth::from_date(*date);
            report(service.save_day(&mut state, *date, text, *color).await, "Saved schedule");
        }
        Commands::Add { date, text, color } => {
            state.cursor = YearMonth::from_date(*date);
            report(service.add_event(&mut state, *date, text, *color).await, "Added schedule");
        }
        Commands::Color { date, color } => {
            state.cursor = YearMonth::from_date(*date);
            report(service.set_day_color(&mut state, *date, *color).await, "Saved day color");
        }
        Commands::ClearColor { date } => {
            state.cursor = YearMonth::from_date(*date);
            report(service.clear_day_color(&mut state, *date).await, "Cleared day color");
        }
        Commands::GlobalColor { color } => {
            report(service.set_global_color(&mut state, *color).await, "Saved global color");
        }
        Commands::Login | Commands::Logout => {}
    }

    let grid = service.grid(&state, today);
    print!("{}", render_month(&grid, &settings.weekday_labels));
    Ok(())
}

fn target_month(
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<YearMonth, Box<dyn std::error::Error>> {
    let current = YearMonth::from_date(today);
    Ok(YearMonth::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?)
}

fn report(ok: bool, action: &str) {
    if ok {
        println!("{}", action);
    } else {
        println!("{} failed, see log for details", action);
    }
}

async fn prompt_login<S: CalendarStore>(
    settings: &Settings,
    store: &S,
) -> Result<String, Box<dyn std::error::Error>> {
    let auth = AuthService::new(store);
    let username = Text::new("Username").prompt()?;
    let password = Password::new("Password").without_confirmation().prompt()?;
    if auth
        .login(&settings.login_file, &username, &password, Utc::now())
        .await?
    {
        info!("Remembering login for {}", username);
        Ok(username)
    } else {
        Err("Invalid username or password".into())
    }
}
