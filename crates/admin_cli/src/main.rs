use std::{error::Error, io::Write};

use accounts::{Accounts, AccountsError, NewUser, Role, User as Account};
use clap::{ArgGroup, Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "studydesk_admin")]
#[command(about = "Admin utilities for studydesk (bootstrap users, assign roles)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./studydesk.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user; the password is prompted for.
    Create(UserCreateArgs),
    /// Assign the teacher/student role out of band.
    SetRole(UserSetRoleArgs),
    List,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long, default_value = "student", value_parser = parse_role)]
    role: Role,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    bio: Option<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("who").required(true).args(["email", "username"])))]
struct UserSetRoleArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long, value_parser = parse_role)]
    role: Role,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read a line without echoing it, printing `*` per character.
fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn notice(message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            notice("Password must not be empty.")?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        notice("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn describe(user: &Account) -> String {
    format!(
        "{}  {:<24} {:<32} {}",
        user.id, user.username, user.email, user.role
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let accounts = Accounts::builder().database(db).build();

    let User { command } = match cli.command {
        Command::User(user) => user,
    };

    match command {
        UserCommand::Create(args) => {
            let password = prompt_password_twice()?;
            let created = accounts
                .register(NewUser {
                    email: args.email,
                    username: args.username,
                    password,
                    role: args.role,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    bio: args.bio,
                })
                .await;

            match created {
                Ok(user) => println!("created user: {}", describe(&user)),
                Err(err @ (AccountsError::ExistingKey(_) | AccountsError::InvalidInput(_))) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        UserCommand::SetRole(args) => {
            let lookup = match (args.email, args.username) {
                (Some(email), _) => accounts.user_by_email(&email).await,
                (None, Some(username)) => accounts.user_by_username(&username).await,
                (None, None) => {
                    eprintln!("--email or --username is required");
                    std::process::exit(2);
                }
            };
            let user = match lookup {
                Ok(user) => user,
                Err(AccountsError::KeyNotFound(key)) => {
                    eprintln!("user not found: {key}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            let updated = accounts.set_role(user.id, args.role).await?;
            println!("updated user: {}", describe(&updated));
        }
        UserCommand::List => {
            for user in accounts.list_users().await? {
                println!("{}", describe(&user));
            }
        }
    }

    Ok(())
}
