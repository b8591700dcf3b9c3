//! Command-line argument parsing

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "regtag")]
#[command(about = "List tags sharing an image, or add a tag to an image, on a Docker registry")]
#[command(version)]
pub struct Args {
    /// Image reference
    #[arg(
        value_name = "IMAGE",
        help = "Image as [scheme://]registry/repository[:tag]; the tag defaults to latest"
    )]
    pub image: Option<String>,

    /// Tag to add
    #[arg(
        value_name = "NEW_TAG",
        help = "Tag to create from IMAGE's manifest; lists equivalent tags when omitted"
    )]
    pub new_tag: Option<String>,

    /// Explicit credentials
    #[arg(
        long = "creds",
        value_name = "USERNAME[:PASSWORD]",
        help = "Use these credentials instead of the stored registry login"
    )]
    pub creds: Option<String>,

    /// Login file override
    #[arg(
        long = "authfile",
        value_name = "PATH",
        help = "Read stored credentials from this file only"
    )]
    pub authfile: Option<PathBuf>,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet output
    #[arg(
        long = "quiet",
        short = 'q',
        conflicts_with = "verbose",
        help = "Only print results and errors"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Number of positional arguments given
    pub fn positional_count(&self) -> usize {
        self.image.iter().count() + self.new_tag.iter().count()
    }

    /// `--creds` value, treating an empty value as absent
    pub fn explicit_creds(&self) -> Option<&str> {
        self.creds.as_deref().filter(|c| !c.is_empty())
    }

    /// Help text followed by examples
    pub fn usage() -> String {
        let mut usage = Args::command().render_help().to_string();
        usage.push_str("\nExamples:\n");
        usage.push_str("  # List tags sharing the image of registry.example.com/team/app:v1.4\n");
        usage.push_str("  regtag registry.example.com/team/app:v1.4\n");
        usage.push('\n');
        usage.push_str("  # Add the tag stable to that image\n");
        usage.push_str("  regtag registry.example.com/team/app:v1.4 stable\n");
        usage.push('\n');
        usage.push_str("  # Plain HTTP registry with explicit credentials\n");
        usage.push_str("  regtag --creds admin:secret http://localhost:5000/app\n");
        usage.push('\n');
        usage.push_str("Stored credentials are read from the docker/podman login files unless --creds is given.\n");
        usage
    }

    /// Load configuration from environment variables
    pub fn from_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Fill unset options from `lookup`, which maps a variable name to its value.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.explicit_creds().is_none() {
            if let Some(creds) = lookup("REGTAG_CREDS") {
                self.creds = Some(creds);
            }
        }

        if self.authfile.is_none() {
            self.authfile = lookup("REGTAG_AUTHFILE").map(PathBuf::from);
        }

        if !self.quiet && lookup("REGTAG_VERBOSE").is_some() {
            self.verbose = true;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_positional_arguments() {
        assert_eq!(parse(&["regtag"]).positional_count(), 0);

        let args = parse(&["regtag", "reg/img:v1"]);
        assert_eq!(args.positional_count(), 1);
        assert_eq!(args.image.as_deref(), Some("reg/img:v1"));

        let args = parse(&["regtag", "reg/img:v1", "v2"]);
        assert_eq!(args.positional_count(), 2);
        assert_eq!(args.new_tag.as_deref(), Some("v2"));
    }

    #[test]
    fn test_too_many_positionals_rejected() {
        assert!(Args::try_parse_from(["regtag", "a/b", "c", "d"]).is_err());
    }

    #[test]
    fn test_creds_flag() {
        let args = parse(&["regtag", "--creds", "user:pass", "reg/img"]);
        assert_eq!(args.explicit_creds(), Some("user:pass"));

        let args = parse(&["regtag", "--creds", "", "reg/img"]);
        assert_eq!(args.explicit_creds(), None);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["regtag", "-v", "-q", "reg/img"]).is_err());
    }

    #[test]
    fn test_env_fills_unset_options() {
        let env: HashMap<&str, &str> = [
            ("REGTAG_CREDS", "ci:token"),
            ("REGTAG_AUTHFILE", "/run/auth.json"),
            ("REGTAG_VERBOSE", "1"),
        ]
        .into_iter()
        .collect();

        let args = parse(&["regtag", "reg/img"]).with_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(args.explicit_creds(), Some("ci:token"));
        assert_eq!(args.authfile, Some(PathBuf::from("/run/auth.json")));
        assert!(args.verbose);
    }

    #[test]
    fn test_flags_win_over_env() {
        let args = parse(&["regtag", "--creds", "me:pw", "reg/img"])
            .with_env(|k| (k == "REGTAG_CREDS").then(|| "ci:token".to_string()));
        assert_eq!(args.explicit_creds(), Some("me:pw"));
    }

    #[test]
    fn test_usage_mentions_examples() {
        let usage = Args::usage();
        assert!(usage.contains("Usage"));
        assert!(usage.contains("regtag registry.example.com/team/app:v1.4 stable"));
    }
}
