use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate};

use photo_calendar::memory_vault::MemoryVault;
use photo_calendar::periodic::DefaultPeriodicNotes;
use photo_calendar::utils::print_day_metadata;
use photo_calendar::{PhotoCalendar, Settings};


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let fixture = match args.get(1) {
        Some(path) => path,
        None => {
            let program = args.first().map(String::as_str).unwrap_or("photo-calendar-demo");
            eprintln!("Usage: {} <vault.json> [YYYY-MM]", program);
            std::process::exit(1);
        }
    };

    let vault = match MemoryVault::from_fixture_file(Path::new(fixture)) {
        Ok(vault) => Arc::new(vault),
        Err(err) => {
            eprintln!("Invalid vault: {}", err);
            std::process::exit(1);
        }
    };

    let first_day = match args.get(2) {
        Some(month) => match NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                eprintln!("Invalid month {:?}: {}", month, err);
                std::process::exit(1);
            }
        },
        None => {
            let today = Local::now().date_naive();
            today - Duration::days(today.day0() as i64)
        },
    };

    let calendar = PhotoCalendar::new(vault, Settings::default(), Arc::new(DefaultPeriodicNotes), || {});
    let source = calendar.source();

    println!("---- {} -----", first_day.format("%B %Y"));
    let mut day = first_day;
    while day.month() == first_day.month() {
        if day == first_day || day.weekday().num_days_from_sunday() == 0 {
            match source.get_weekly_metadata(day).await {
                Ok(metadata) => print_day_metadata(&format!("week of {}", day), &metadata),
                Err(err) => log::warn!("Unable to compute the week of {}: {}", day, err),
            }
        }
        match source.get_daily_metadata(day).await {
            Ok(metadata) => print_day_metadata(&day.to_string(), &metadata),
            Err(err) => log::warn!("Unable to compute {}: {}", day, err),
        }
        day = day + Duration::days(1);
    }

    calendar.shutdown();
}
