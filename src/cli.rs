// CLI module for argument parsing and configuration
use crate::config::UserConfig;
use crate::error::{Result, SweepError};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Target directory name used when neither the CLI nor the config file names one
pub const DEFAULT_TARGET: &str = "node_modules";

/// Depsweep - find dependency-cache folders and reclaim their disk space
///
/// Scans a directory tree for folders with a given name, shows them as a
/// size-sorted tree and deletes the ones you select.
#[derive(Parser, Debug, Clone)]
#[command(name = "depsweep")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Name of the directories to look for [default: node_modules]
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Dry run mode - report what would be deleted without removing anything
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Skip the confirmation dialog before deleting
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Ignore matches smaller than this (e.g., "500KB", "10MB", "1GB")
    #[arg(long = "min-size")]
    pub min_size: Option<String>,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Parse a size string (e.g., "5MB", "100KB") into bytes
    pub fn parse_size(size_str: &str) -> Option<u64> {
        let size_str = size_str.trim().to_uppercase();

        let (num_str, multiplier): (&str, u64) = if let Some(n) = size_str.strip_suffix("GB") {
            (n, 1024 * 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("MB") {
            (n, 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("KB") {
            (n, 1024)
        } else if let Some(n) = size_str.strip_suffix('B') {
            (n, 1)
        } else {
            // Assume bytes if no suffix
            (size_str.as_str(), 1)
        };

        let num: f64 = num_str.trim().parse().ok()?;
        if !num.is_finite() || num < 0.0 {
            return None;
        }

        Some((num * multiplier as f64) as u64)
    }

    /// Get minimum size in bytes
    pub fn get_min_size(&self) -> Option<u64> {
        self.min_size.as_ref().and_then(|s| Self::parse_size(s))
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if let Some(ref target) = self.target {
            validate_target(target)?;
        }

        if let Some(ref min) = self.min_size {
            if Self::parse_size(min).is_none() {
                return Err(format!(
                    "Invalid min-size format: '{}'. Use format like '5MB', '100KB', '1GB'",
                    min
                ));
            }
        }

        Ok(())
    }
}

/// A target must be a single, non-empty path segment
pub fn validate_target(target: &str) -> std::result::Result<(), String> {
    if target.trim().is_empty() {
        return Err("Target name cannot be empty".to_string());
    }
    if target.contains('/') || target.contains(std::path::MAIN_SEPARATOR) {
        return Err(format!(
            "Target name must be a single directory name, got '{}'",
            target
        ));
    }
    if target == "." || target == ".." {
        return Err(format!("Target name '{}' is not allowed", target));
    }
    Ok(())
}

/// Configuration derived from CLI arguments and the user config file
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absolute scan root
    pub directory: PathBuf,
    pub target: String,
    pub dry_run: bool,
    pub skip_confirm: bool,
    pub min_size: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Merges CLI arguments over the user config. CLI values win.
    pub fn resolve(args: Args, user: &UserConfig) -> Result<Self> {
        let directory = args.directory.canonicalize()?;

        let target = args
            .target
            .clone()
            .or_else(|| user.target.clone())
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());
        validate_target(&target).map_err(SweepError::InvalidArgument)?;

        Ok(AppConfig {
            directory,
            min_size: args.get_min_size(),
            target,
            dry_run: args.dry_run,
            skip_confirm: args.yes || user.skip_confirm.unwrap_or(false),
            log_file: args.log_file,
            log_level: user.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(directory: PathBuf) -> Args {
        Args {
            directory,
            target: None,
            dry_run: false,
            yes: false,
            min_size: None,
            log_file: None,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_parse_size_bytes() {
            assert_eq!(Args::parse_size("100"), Some(100));
            assert_eq!(Args::parse_size("100B"), Some(100));
            assert_eq!(Args::parse_size("0"), Some(0));
        }

        #[test]
        fn test_parse_size_units() {
            assert_eq!(Args::parse_size("1KB"), Some(1024));
            assert_eq!(Args::parse_size("1.5KB"), Some(1536));
            assert_eq!(Args::parse_size("10MB"), Some(10 * 1024 * 1024));
            assert_eq!(Args::parse_size("1GB"), Some(1024 * 1024 * 1024));
        }

        #[test]
        fn test_parse_size_case_insensitive() {
            assert_eq!(Args::parse_size("1kb"), Some(1024));
            assert_eq!(Args::parse_size(" 1Mb "), Some(1024 * 1024));
        }

        #[test]
        fn test_parse_size_invalid() {
            assert_eq!(Args::parse_size("abc"), None);
            assert_eq!(Args::parse_size("MB"), None);
            assert_eq!(Args::parse_size(""), None);
            assert_eq!(Args::parse_size("-5MB"), None);
        }

        #[test]
        fn test_parse_from_command_line() {
            let args = Args::try_parse_from([
                "depsweep",
                "/tmp",
                "--target",
                "target",
                "--dry-run",
                "-y",
                "--min-size",
                "1MB",
            ])
            .unwrap();

            assert_eq!(args.directory, PathBuf::from("/tmp"));
            assert_eq!(args.target.as_deref(), Some("target"));
            assert!(args.dry_run);
            assert!(args.yes);
            assert_eq!(args.get_min_size(), Some(1024 * 1024));
        }

        #[test]
        fn test_args_default_values() {
            let args = Args::try_parse_from(["depsweep"]).unwrap();

            assert_eq!(args.directory, PathBuf::from("."));
            assert!(args.target.is_none());
            assert!(!args.dry_run);
            assert!(!args.yes);
            assert!(args.get_min_size().is_none());
        }

        #[test]
        fn test_args_validate_nonexistent_directory() {
            let args = args_for(PathBuf::from("/nonexistent/path/12345"));
            let result = args.validate();
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_args_validate_file_is_not_directory() {
            let dir = TempDir::new().unwrap();
            let file = dir.path().join("file.txt");
            std::fs::write(&file, "x").unwrap();

            let result = args_for(file).validate();
            assert!(result.unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_args_validate_invalid_size_format() {
            let mut args = args_for(PathBuf::from("."));
            args.min_size = Some("invalid".to_string());
            assert!(args.validate().unwrap_err().contains("Invalid min-size"));
        }

        #[test]
        fn test_args_validate_target_name() {
            let mut args = args_for(PathBuf::from("."));
            args.target = Some("a/b".to_string());
            assert!(args.validate().is_err());

            args.target = Some("".to_string());
            assert!(args.validate().is_err());

            args.target = Some("..".to_string());
            assert!(args.validate().is_err());

            args.target = Some(".venv".to_string());
            assert!(args.validate().is_ok());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_resolve_defaults() {
            let dir = TempDir::new().unwrap();
            let config =
                AppConfig::resolve(args_for(dir.path().to_path_buf()), &UserConfig::default())
                    .unwrap();

            assert_eq!(config.directory, dir.path().canonicalize().unwrap());
            assert_eq!(config.target, DEFAULT_TARGET);
            assert!(!config.dry_run);
            assert!(!config.skip_confirm);
            assert!(config.directory.is_absolute());
        }

        #[test]
        fn test_resolve_user_config_fills_gaps() {
            let dir = TempDir::new().unwrap();
            let user = UserConfig {
                target: Some("target".to_string()),
                skip_confirm: Some(true),
                log_level: Some("debug".to_string()),
            };
            let config = AppConfig::resolve(args_for(dir.path().to_path_buf()), &user).unwrap();

            assert_eq!(config.target, "target");
            assert!(config.skip_confirm);
            assert_eq!(config.log_level.as_deref(), Some("debug"));
        }

        #[test]
        fn test_resolve_cli_wins_over_user_config() {
            let dir = TempDir::new().unwrap();
            let user = UserConfig {
                target: Some("target".to_string()),
                ..UserConfig::default()
            };
            let mut args = args_for(dir.path().to_path_buf());
            args.target = Some(".venv".to_string());

            let config = AppConfig::resolve(args, &user).unwrap();
            assert_eq!(config.target, ".venv");
        }

        #[test]
        fn test_resolve_rejects_bad_config_target() {
            let dir = TempDir::new().unwrap();
            let user = UserConfig {
                target: Some("a/b".to_string()),
                ..UserConfig::default()
            };
            let result = AppConfig::resolve(args_for(dir.path().to_path_buf()), &user);
            assert!(matches!(result, Err(SweepError::InvalidArgument(_))));
        }
    }
}
