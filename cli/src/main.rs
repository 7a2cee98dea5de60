//! `household`: drive the household registration API from a terminal.

mod render;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use household_core::display::{self, display_value, DisplayMap};
use household_core::{
    ApiConfig, ApiError, CreateHousehold, Household, HouseholdApi, HttpRequest, LoginRequest,
    LoginResponse, NewResident, Resident, Transport, UpdateHousehold, UpdateResident,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "household", version, about = "Household registration API client")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "NEXT_PUBLIC_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token from `household login`.
    #[arg(long, env = "HOUSEHOLD_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Print the backend's JSON response instead of labelled text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a session and print its access token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "HOUSEHOLD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the caller's household.
    Info,
    /// List the members of the caller's household.
    Members,
    /// Register a household together with its head.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        head_name: String,
        #[arg(long)]
        head_gender: Option<String>,
        #[arg(long)]
        head_date_of_birth: Option<String>,
        #[arg(long)]
        head_id_card_number: Option<String>,
    },
    /// Add a member to the caller's household.
    AddMember {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        details: MemberDetails,
    },
    /// Change fields of an existing member.
    UpdateMember {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        details: MemberDetails,
    },
    /// Remove a member from the household.
    DeleteMember { id: i64 },
    /// Change the household's name or address.
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List every household (admin only).
    AdminList,
    /// Show the label for a code, or a whole table.
    Label { table: Table, code: Option<String> },
}

#[derive(Debug, Args)]
struct MemberDetails {
    #[arg(long)]
    date_of_birth: Option<String>,
    /// MALE, FEMALE or OTHER.
    #[arg(long)]
    gender: Option<String>,
    /// HEAD, SPOUSE, CHILD, ...
    #[arg(long)]
    relationship: Option<String>,
    #[arg(long)]
    id_card_number: Option<String>,
    #[arg(long)]
    occupation: Option<String>,
    /// PERMANENT, TEMPORARY, ...
    #[arg(long)]
    residence_status: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Table {
    State,
    Role,
    HouseholdStatus,
    InformationStatus,
    Gender,
    Relationship,
    ResidenceStatus,
}

impl Table {
    fn map(self) -> &'static DisplayMap {
        match self {
            Table::State => &display::STATE,
            Table::Role => &display::ROLE,
            Table::HouseholdStatus => &display::HOUSEHOLD_STATUS,
            Table::InformationStatus => &display::INFORMATION_STATUS,
            Table::Gender => &display::GENDER,
            Table::Relationship => &display::RELATIONSHIP,
            Table::ResidenceStatus => &display::RESIDENCE_STATUS,
        }
    }
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, ApiError> {
    dispatch(&HouseholdApi::new(api_config(&cli)), cli)
}

fn api_config(cli: &Cli) -> ApiConfig {
    ApiConfig::from_lookup(|_| cli.api_url.clone())
}

fn dispatch<T: Transport>(api: &HouseholdApi<T>, cli: Cli) -> Result<String, ApiError> {
    let client = api.client();
    let token = cli.token.as_deref();
    let json = cli.json;

    match cli.command {
        Command::Login { username, password } => {
            let request = client.build_login(&LoginRequest { username, password })?;
            fetch(api, json, request, |session: &LoginResponse| {
                session.access_token.clone()
            })
        }
        Command::Info => fetch(
            api,
            json,
            client.build_get_household(token)?,
            render::household_summary,
        ),
        Command::Members => fetch(
            api,
            json,
            client.build_get_household_members(token)?,
            |members: &Vec<Resident>| render::members_table(members),
        ),
        Command::Create {
            name,
            address,
            head_name,
            head_gender,
            head_date_of_birth,
            head_id_card_number,
        } => {
            let input = CreateHousehold {
                name,
                address,
                head: NewResident {
                    name: head_name,
                    gender: head_gender,
                    date_of_birth: head_date_of_birth,
                    id_card_number: head_id_card_number,
                    ..NewResident::default()
                },
            };
            let request = client.build_create_household(&input, token)?;
            fetch(api, json, request, render::household_summary)
        }
        Command::AddMember { name, details } => {
            let input = NewResident {
                name,
                date_of_birth: details.date_of_birth,
                gender: details.gender,
                relationship: details.relationship,
                id_card_number: details.id_card_number,
                occupation: details.occupation,
                residence_status: details.residence_status,
            };
            let request = client.build_add_household_member(&input, token)?;
            fetch(api, json, request, render::resident_row)
        }
        Command::UpdateMember { id, name, details } => {
            let input = UpdateResident {
                name,
                date_of_birth: details.date_of_birth,
                gender: details.gender,
                relationship: details.relationship,
                id_card_number: details.id_card_number,
                occupation: details.occupation,
                residence_status: details.residence_status,
            };
            let request = client.build_update_household_member(id, &input, token)?;
            fetch(api, json, request, render::resident_row)
        }
        Command::DeleteMember { id } => {
            let ack: Value = api.send(client.build_delete_household_member(id, token)?)?;
            match ack.get("message").and_then(|m| m.as_str()) {
                Some(message) if !json => Ok(message.to_string()),
                _ => to_json(&ack),
            }
        }
        Command::Update { name, address } => {
            let request = client.build_update_household(&UpdateHousehold { name, address }, token)?;
            fetch(api, json, request, render::household_summary)
        }
        Command::AdminList => fetch(
            api,
            json,
            client.build_list_households(token)?,
            |households: &Vec<Household>| render::households_table(households),
        ),
        Command::Label { table, code } => Ok(label(table.map(), code.as_deref())),
    }
}

fn label(map: &DisplayMap, code: Option<&str>) -> String {
    match code {
        Some(code) => display_value(Some(code), map).to_string(),
        None => map
            .entries()
            .iter()
            .map(|(code, label)| format!("{code}\t{label}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Send `request`; with `--json` print the backend's answer as received,
/// otherwise decode it as `R` and render it as text.
fn fetch<T, R, F>(
    api: &HouseholdApi<T>,
    json: bool,
    request: HttpRequest,
    text: F,
) -> Result<String, ApiError>
where
    T: Transport,
    R: DeserializeOwned,
    F: FnOnce(&R) -> String,
{
    if json {
        to_json(&api.send::<Value>(request)?)
    } else {
        Ok(text(&api.send::<R>(request)?))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Serialization(e.to_string()))
}
