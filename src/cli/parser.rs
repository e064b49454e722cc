use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rReception
/// Kiosk receptionist backed by SQLite
#[derive(Parser)]
#[command(
    name = "rreception",
    version = env!("CARGO_PKG_VERSION"),
    about = "A front-desk receptionist: greets employees, logs attendance, books meetings and notifies people by SMS",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (e.g. attendance, sms)")]
        operation: Option<String>,
    },

    /// Start the receptionist: wait for the wake word, recognize, converse
    Run {
        #[arg(long = "as", value_name = "NAME", help = "Skip recognition: the person at the desk is this employee")]
        as_employee: Option<String>,

        #[arg(long = "visitor", conflicts_with = "as_employee", help = "Skip recognition: the person at the desk is a visitor")]
        visitor: bool,
    },

    /// Ask the receptionist a single question and print the answer
    Ask {
        /// What the person at the desk says
        text: String,

        #[arg(long = "as", value_name = "NAME", help = "Ask as this employee")]
        as_employee: Option<String>,

        #[arg(long = "visitor", conflicts_with = "as_employee", help = "Ask as a visitor (default)")]
        visitor: bool,
    },

    /// Manage the employee directory
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Arrival records
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Employee meetings
    Appointment {
        #[command(subcommand)]
        action: AppointmentAction,
    },

    /// Face database used for recognition
    Faces {
        #[command(subcommand)]
        action: FacesAction,
    },

    /// Outgoing SMS
    Sms {
        #[command(subcommand)]
        action: SmsAction,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Add an employee
    Add {
        name: String,

        #[arg(long, default_value = "")]
        department: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        position: String,

        #[arg(long = "joined", value_name = "YYYY-MM-DD", default_value = "")]
        join_date: String,
    },

    /// List employees
    List {
        #[arg(long, help = "Only this department")]
        department: Option<String>,
    },

    /// Show one employee as the receptionist would find them
    Show { name: String },

    /// Import employees from a CSV file (existing names are skipped)
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Delete an employee by name
    Del { name: String },
}

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Record an arrival (first arrival of the day wins)
    Log {
        name: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Date (default: today)")]
        date: Option<String>,

        #[arg(long, value_name = "HH:MM", help = "Arrival time (default: now)")]
        time: Option<String>,
    },

    /// List who arrived on a day
    List {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Date (default: today)")]
        date: Option<String>,
    },

    /// Export attendance records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum AppointmentAction {
    /// Book a meeting
    Add {
        #[arg(long, help = "Who books the meeting")]
        organizer: String,

        #[arg(long = "with", help = "Employee being met")]
        participant: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: String,

        #[arg(long, value_name = "HH:MM")]
        time: String,

        #[arg(long, help = "Duration in minutes (default from config)")]
        duration: Option<i64>,
    },

    /// List meetings
    List {
        #[arg(long, help = "Only meetings involving this person")]
        person: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },

    /// Cancel a meeting by id
    Cancel { id: i64 },

    /// Free slots of an employee on a day
    Slots {
        name: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Date (default: today)")]
        date: Option<String>,

        #[arg(long, help = "Duration in minutes (default from config)")]
        duration: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum FacesAction {
    /// Enroll an embedding for a person
    Enroll {
        name: String,

        #[arg(long, value_name = "FILE", help = "JSON array with the embedding (default: run the capture command)")]
        embedding: Option<String>,
    },

    /// List enrolled people
    List,

    /// Identify an embedding against the face database
    Identify {
        #[arg(long, value_name = "FILE", help = "JSON array with the embedding (default: run the capture command)")]
        embedding: Option<String>,
    },

    /// Remove a person from the face database
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum SmsAction {
    /// Most recent messages first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
