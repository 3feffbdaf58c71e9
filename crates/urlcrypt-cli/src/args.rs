use std::convert::Infallible;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use jiff::SignedDuration;
use urlcrypt::config::{DEFAULT_ITERATIONS, DEFAULT_SALT_LEN};
use urlcrypt::{Codec, CodecConfig, Secret};

use crate::error::CliError;

#[derive(Parser, Debug, Clone)]
#[command(version = "2.0.0", about = "Issue and check encrypted URL-safe tokens")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shared secret; at least 43 characters, e.g. from `urlcrypt generate-secret`
    #[clap(
        long,
        value_name = "SECRET",
        env = "URLCRYPT_SECRET",
        hide_env_values = true,
        global = true,
        value_parser = parse_secret
    )]
    pub secret: Option<Secret>,

    /// Random salt bytes prepended to each payload; must match between encode and decode
    #[clap(
        long,
        value_name = "N",
        env = "URLCRYPT_SALT_LEN",
        default_value_t = DEFAULT_SALT_LEN,
        global = true
    )]
    pub salt_len: usize,

    /// PBKDF2 iterations used to derive the key; must match between encode and decode
    #[clap(
        long,
        value_name = "N",
        env = "URLCRYPT_ITERATIONS",
        default_value_t = DEFAULT_ITERATIONS,
        global = true
    )]
    pub iterations: u32,

    /// Keep quiet and only log errors
    #[clap(short, long, conflicts_with = "verbose", default_value_t = false, global = true)]
    pub quiet: bool,

    #[clap(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Output details; specify multiple times for more detail"
    )]
    pub verbose: u8,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print a new random secret suitable for --secret
    GenerateSecret,

    /// Encode a JSON document into a token
    Encode {
        #[clap(short, long, help = "File containing the JSON document (default: stdin)")]
        input: Option<PathBuf>,
    },

    /// Decode a token back into its JSON document
    Decode {
        #[clap(help = "Token to decode (default: read from stdin)")]
        token: Option<String>,

        #[clap(short, long, help = "Pretty-print the decoded JSON")]
        pretty: bool,
    },

    /// Issue an email verification link
    Link {
        #[clap(short, long, help = "Email address being verified")]
        email: String,

        #[clap(
            short,
            long,
            value_name = "URL",
            help = "Verification endpoint; the token is appended as the last path segment"
        )]
        base_url: String,

        #[clap(short, long, value_name = "IP", help = "Address the request came from")]
        source_address: Option<IpAddr>,
    },

    /// Check an email verification link or token
    Verify {
        #[clap(help = "Verification link or bare token")]
        link: String,

        #[clap(
            long,
            value_name = "DURATION",
            default_value = "24h",
            value_parser = parse_max_age,
            help = "Reject links issued longer ago than this, e.g. '90s', '30m', '24h'"
        )]
        max_age: SignedDuration,
    },
}

fn parse_secret(value: &str) -> Result<Secret, Infallible> {
    Ok(Secret::from(value))
}

fn parse_max_age(value: &str) -> Result<SignedDuration, String> {
    let max_age: SignedDuration = value.parse().map_err(|e| format!("{e}"))?;
    if max_age.is_negative() {
        return Err(format!("must not be negative: got {max_age:#}"));
    }
    Ok(max_age)
}

impl Cli {
    /// Build the codec described by the global options.
    pub fn codec(&self) -> Result<Codec, CliError> {
        let secret = self.secret.clone().ok_or(CliError::MissingSecret)?;

        let config = CodecConfig::builder(secret)
            .salt_len(self.salt_len)
            .iterations(self.iterations)
            .build()?;

        Ok(Codec::from_config(config))
    }
}
