//! `attendance` - CLI for driver-attendance
//!
//! This binary provides the command-line front end for checking drivers in
//! and out and viewing the daily attendance table.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;

use driver_attendance::cli::{
    AdminCommand, CheckInCommand, CheckOutCommand, Cli, Command, ConfigCommand, ListCommand,
    OutputFormat, StatsCommand,
};
use driver_attendance::render::{format_plain, format_stats, format_table, format_time};
use driver_attendance::{
    init_logging, AdminGate, AttendanceRecord, Config, EventKind, RecordStore, Session, Shift,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::CheckIn(cmd) => handle_check_in(&mut open_session(&config)?, &cmd),
        Command::CheckOut(cmd) => handle_check_out(&mut open_session(&config)?, &cmd),
        Command::SetCar(cmd) => {
            open_session(&config)?.update_car(&cmd.id, &cmd.car)?;
            println!("Car for record {} set to \"{}\"", cmd.id, cmd.car);
            Ok(())
        }
        Command::List(cmd) => handle_list(&open_session(&config)?, &cmd),
        Command::Stats(cmd) => handle_stats(&open_session(&config)?, &cmd),
        Command::Admin(cmd) => handle_admin(&mut open_session(&config)?, cmd),
    }
}

fn open_session(config: &Config) -> anyhow::Result<Session> {
    let path = config.database_path();
    let store = RecordStore::open(&path, config.storage.records_key.clone())
        .with_context(|| format!("opening record store at {}", path.display()))?;
    Ok(Session::open(store, AdminGate::new(&config.admin.password)))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn handle_check_in(session: &mut Session, cmd: &CheckInCommand) -> anyhow::Result<()> {
    let date = cmd.date.unwrap_or_else(today);
    session.begin_check_in(&cmd.driver, cmd.shift.into())?;
    let record = session.submit(&cmd.log, cmd.car.as_deref(), date, Utc::now())?;
    print_saved(EventKind::CheckIn, record);
    Ok(())
}

fn handle_check_out(session: &mut Session, cmd: &CheckOutCommand) -> anyhow::Result<()> {
    let date = cmd.date.unwrap_or_else(today);
    let shift = session.check_out_shift(&cmd.driver, date, cmd.shift.map(Shift::from))?;
    session.begin_check_out(&cmd.driver, shift)?;
    let record = session.submit(&cmd.log, None, date, Utc::now())?;
    print_saved(EventKind::CheckOut, record);
    Ok(())
}

fn print_saved(kind: EventKind, record: &AttendanceRecord) {
    let (action, stamp) = match kind {
        EventKind::CheckIn => ("Checked in", record.check_in.as_ref()),
        EventKind::CheckOut => ("Checked out", record.check_out.as_ref()),
    };
    let at = stamp.map_or_else(String::new, |s| format!(" at {}", format_time(s.time)));
    println!(
        "{action} {} ({}){at} on {}",
        record.driver_name,
        record.shift.label(),
        record.date
    );
    println!("Record: {}", record.id);
}

fn handle_list(session: &Session, cmd: &ListCommand) -> anyhow::Result<()> {
    let date = cmd.date.unwrap_or_else(today);
    let records: Vec<&AttendanceRecord> = session.records_on(date).collect();

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Table => {
            println!("Attendance for {date}");
            println!();
            print!("{}", format_table(records));
        }
        OutputFormat::Plain => print!("{}", format_plain(records)),
    }
    Ok(())
}

fn handle_stats(session: &Session, cmd: &StatsCommand) -> anyhow::Result<()> {
    let date = cmd.date.unwrap_or_else(today);
    let stats = session.stats(date);

    if cmd.json {
        let out = serde_json::json!({
            "date": date,
            "total_drivers": stats.total_drivers,
            "checked_in": stats.checked_in,
            "checked_out": stats.checked_out,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Attendance stats for {date}");
        println!("----------------------------");
        print!("{}", format_stats(&stats));
    }
    Ok(())
}

fn handle_admin(session: &mut Session, cmd: AdminCommand) -> anyhow::Result<()> {
    match cmd {
        AdminCommand::Clear { password, yes } => {
            session.admin_mut().login(&password)?;
            session.admin_mut().request_clear()?;

            if yes {
                let removed = session.clear_all()?;
                println!("All attendance data has been cleared ({removed} records removed).");
            } else {
                println!(
                    "This will permanently delete all {} attendance records.",
                    session.records().len()
                );
                println!("Use --yes to confirm.");
                session.admin_mut().cancel_clear();
            }
            session.admin_mut().logout();
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                let mut shown = config.clone();
                shown.admin.password = "********".to_string();
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Records key:    {}", config.storage.records_key);
                println!();
                println!("[Admin]");
                println!("  Password:       (set)");
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
