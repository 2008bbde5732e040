use std::path::PathBuf;

use crate::error::{Result, RosterError};
use crate::export::DEFAULT_OUTPUT_PATH;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PREFERENCES_PATH: &str = "data/preferences.csv";
pub const DEFAULT_SUBMISSIONS_PATH: &str = "data/submissions.csv";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub const USAGE: &str = "\
usage:
  shift-roster generate [PREFERENCES.csv] [--seed N] [--output PATH] [--text PATH]
  shift-roster web [PORT]

environment:
  ROSTER_SEED          seed for the backfill random source
  ROSTER_OUTPUT        schedule document path (default weekly_schedule_output.json)
  ROSTER_SUBMISSIONS   CSV that web submissions are appended to
  ADMIN_PASSWORD       password for the web upload endpoint
  RUST_LOG             log filter (default info)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate { preferences: PathBuf },
    Web { port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub command: Command,
    /// Fixed seed for reproducible schedules; fresh entropy when absent
    pub seed: Option<u64>,
    pub output_path: PathBuf,
    pub text_path: Option<PathBuf>,
    pub submissions_path: PathBuf,
    pub admin_password: String,
    /// True when no ADMIN_PASSWORD was set and the built-in one is in use
    pub default_password: bool,
}

impl AppConfig {
    /// Reads the process arguments and environment
    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Arguments win over environment variables
    pub fn parse<I, E>(args: I, env: E) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();

        let mut seed = match env("ROSTER_SEED") {
            Some(value) => Some(parse_seed(&value)?),
            None => None,
        };
        let mut output_path = env("ROSTER_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        let submissions_path = env("ROSTER_SUBMISSIONS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SUBMISSIONS_PATH));
        let (admin_password, default_password) = match env("ADMIN_PASSWORD") {
            Some(password) => (password, false),
            None => (DEFAULT_ADMIN_PASSWORD.to_string(), true),
        };
        let mut text_path = None;

        let command = match args.next().as_deref() {
            Some("web") => {
                let port = match args.next() {
                    Some(p) => p
                        .parse::<u16>()
                        .map_err(|_| RosterError::Config(format!("invalid port '{}'", p)))?,
                    None => DEFAULT_PORT,
                };
                if let Some(extra) = args.next() {
                    return Err(RosterError::Config(format!("unexpected argument '{}'", extra)));
                }
                Command::Web { port }
            }
            None | Some("generate") => {
                let mut preferences = None;
                while let Some(arg) = args.next() {
                    match arg.as_str() {
                        "--seed" => seed = Some(parse_seed(&flag_value(&mut args, "--seed")?)?),
                        "--output" => output_path = PathBuf::from(flag_value(&mut args, "--output")?),
                        "--text" => text_path = Some(PathBuf::from(flag_value(&mut args, "--text")?)),
                        flag if flag.starts_with("--") => {
                            return Err(RosterError::Config(format!("unknown option '{}'", flag)));
                        }
                        path if preferences.is_none() => preferences = Some(PathBuf::from(path)),
                        extra => {
                            return Err(RosterError::Config(format!("unexpected argument '{}'", extra)));
                        }
                    }
                }
                Command::Generate {
                    preferences: preferences.unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH)),
                }
            }
            Some(other) => return Err(RosterError::Config(format!("unknown command '{}'", other))),
        };

        Ok(AppConfig {
            command,
            seed,
            output_path,
            text_path,
            submissions_path,
            admin_password,
            default_password,
        })
    }
}

fn flag_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| RosterError::Config(format!("{} needs a value", flag)))
}

fn parse_seed(value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| RosterError::Config(format!("invalid seed '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<AppConfig> {
        let env: HashMap<String, String> = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::parse(args.iter().map(|a| a.to_string()), |key| env.get(key).cloned())
    }

    #[test]
    fn defaults_to_generate_from_the_data_directory() {
        let config = parse(&[], &[]).unwrap();
        assert_eq!(
            config.command,
            Command::Generate {
                preferences: PathBuf::from(DEFAULT_PREFERENCES_PATH)
            }
        );
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.seed, None);
        assert!(config.default_password);
    }

    #[test]
    fn generate_flags_override_environment() {
        let config = parse(
            &["generate", "prefs.csv", "--seed", "42", "--text", "week.txt"],
            &[("ROSTER_SEED", "7"), ("ROSTER_OUTPUT", "out.json")],
        )
        .unwrap();

        assert_eq!(config.command, Command::Generate { preferences: PathBuf::from("prefs.csv") });
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.output_path, PathBuf::from("out.json"));
        assert_eq!(config.text_path, Some(PathBuf::from("week.txt")));
    }

    #[test]
    fn web_takes_an_optional_port() {
        assert_eq!(parse(&["web"], &[]).unwrap().command, Command::Web { port: DEFAULT_PORT });
        let config = parse(&["web", "9000"], &[("ADMIN_PASSWORD", "s3cret")]).unwrap();
        assert_eq!(config.command, Command::Web { port: 9000 });
        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.default_password);
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(matches!(parse(&["web", "http"], &[]), Err(RosterError::Config(_))));
        assert!(matches!(parse(&["generate", "--seed"], &[]), Err(RosterError::Config(_))));
        assert!(matches!(parse(&["generate", "--verbose"], &[]), Err(RosterError::Config(_))));
        assert!(matches!(parse(&["plan"], &[]), Err(RosterError::Config(_))));
        assert!(matches!(parse(&[], &[("ROSTER_SEED", "abc")]), Err(RosterError::Config(_))));
    }
}
