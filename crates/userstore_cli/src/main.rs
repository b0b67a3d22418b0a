//! `userstore` entry point.
//!
//! # Responsibility
//! - Select one record operation per run from the command line.
//! - Acquire the client once and release it on every exit path.
//! - Report any failure as a single message with a non-zero exit code.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use log::info;
use std::io::Write;
use std::process::ExitCode;
use userstore_core::output::write_record;
use userstore_core::{
    default_log_level, init_logging, with_client, Client, NewUser, ServiceResult, UserService,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(log_level(&cli), log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn log_level(cli: &Cli) -> &str {
    cli.log_level.as_deref().unwrap_or(default_log_level())
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> ServiceResult<()> {
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    let client = Client::open(&cli.db)?;
    with_client(client, |client| {
        let service = UserService::new(client.users()?);
        execute(&service, &cli.command, out)
    })
}

fn execute<R, W>(service: &UserService<R>, command: &Command, out: &mut W) -> ServiceResult<()>
where
    R: userstore_core::UserRepository,
    W: Write,
{
    match command {
        Command::List => service.list_all(out),
        Command::Create {
            name,
            age,
            email,
            email_updates,
        } => {
            let payload = NewUser::new(name.as_str(), *age, email.as_str())
                .with_preference(*email_updates);
            let user = service.create_user(&payload)?;
            write_record(out, &user)?;
            Ok(())
        }
        Command::Find { email } => service.find_by_email(email, out),
        Command::Update { email, name } => {
            let user = service.update_name_by_email(email, name)?;
            write_record(out, &user)?;
            Ok(())
        }
        Command::Delete { email } => service.delete_by_email(email),
    }
}

#[cfg(test)]
mod tests {
    use super::{log_level, run, Cli};
    use userstore_core::default_log_level;
    use clap::Parser;
    use userstore_core::{RepoError, ServiceError};

    fn cli_for(db: &std::path::Path, args: &[&str]) -> Cli {
        let mut argv = vec!["userstore", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn run_to_string(cli: &Cli) -> Result<String, ServiceError> {
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn default_session_creates_finds_updates_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.sqlite3");

        let created = run_to_string(&cli_for(&db, &["create"])).unwrap();
        let created: serde_json::Value = serde_json::from_str(&created).unwrap();
        assert_eq!(created["name"], "Hosen");
        assert_eq!(created["userPreference"]["emailUpdates"], true);

        let found = run_to_string(&cli_for(&db, &["find"])).unwrap();
        let found: serde_json::Value = serde_json::from_str(&found).unwrap();
        assert_eq!(found, created);

        let updated = run_to_string(&cli_for(&db, &["update"])).unwrap();
        let updated: serde_json::Value = serde_json::from_str(&updated).unwrap();
        assert_eq!(updated["name"], "Md. Sabbir Hosen");
        assert_eq!(updated["email"], "hosen@test.com");

        let listed = run_to_string(&cli_for(&db, &["list"])).unwrap();
        let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn default_delete_target_is_missing_and_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.sqlite3");
        run_to_string(&cli_for(&db, &["create"])).unwrap();

        let err = run_to_string(&cli_for(&db, &["delete"])).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepoError::NotFound { ref email }) if email.as_str() == "sabbir@test.com"
        ));

        let found = run_to_string(&cli_for(&db, &["find", "hosen@test.com"])).unwrap();
        assert_ne!(found.trim(), "null");
    }

    #[test]
    fn log_level_prefers_flag_over_build_default() {
        let cli = Cli::try_parse_from([
            "userstore",
            "--log-dir",
            "/tmp/userstore-logs",
            "--log-level",
            "warn",
            "list",
        ])
        .unwrap();
        assert_eq!(log_level(&cli), "warn");

        let cli = Cli::try_parse_from(["userstore", "--log-dir", "/tmp/userstore-logs", "list"])
            .unwrap();
        assert_eq!(log_level(&cli), default_log_level());
    }

    #[test]
    fn find_missing_prints_null() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.sqlite3");

        let found = run_to_string(&cli_for(&db, &["find", "nobody@test.com"])).unwrap();
        assert_eq!(found, "null\n");
    }
}
