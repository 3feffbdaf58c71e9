//! Issue and check urlcrypt tokens from the command line

use std::net::IpAddr;
use std::process::ExitCode;

use clap::Parser;
use data_encoding::BASE64URL_NOPAD;
use jiff::{SignedDuration, Timestamp};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};
use urlcrypt::Codec;
use zeroize::Zeroizing;

use crate::args::{Cli, Commands};
use crate::claim::{VerificationClaim, make_link, token_from_link};
use crate::error::CliError;

mod args;
mod claim;
mod error;

/// Random bytes in a generated secret; 32 bytes encode to exactly 43 base64url characters.
const GENERATED_SECRET_LEN: usize = 32;

type InFile = Box<dyn AsyncRead + Unpin>;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    enable_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut output = tokio::io::stdout();

    match &cli.command {
        Commands::GenerateSecret => handle_generate_secret(&mut output).await,

        Commands::Encode { input } => {
            let codec = cli.codec()?;
            let input: InFile = match input {
                Some(path) => Box::new(File::open(path).await?),
                None => Box::new(tokio::io::stdin()),
            };
            handle_encode(&codec, input, &mut output).await
        }

        Commands::Decode { token, pretty } => {
            let codec = cli.codec()?;
            let token = match token {
                Some(token) => token.clone(),
                None => read_all(tokio::io::stdin()).await?,
            };
            handle_decode(&codec, token.trim(), *pretty, &mut output).await
        }

        Commands::Link {
            email,
            base_url,
            source_address,
        } => {
            let codec = cli.codec()?;
            let now = Timestamp::now();
            handle_link(&codec, email, base_url, *source_address, now, &mut output).await
        }

        Commands::Verify { link, max_age } => {
            let codec = cli.codec()?;
            let now = Timestamp::now();
            handle_verify(&codec, link, *max_age, now, &mut output).await
        }
    }
}

/// Print a fresh random secret
async fn handle_generate_secret<W: AsyncWrite + Unpin>(output: &mut W) -> Result<(), CliError> {
    let mut bytes = Zeroizing::new([0u8; GENERATED_SECRET_LEN]);
    aws_lc_rs::rand::fill(&mut bytes[..]).map_err(|_| CliError::Random)?;

    let secret = Zeroizing::new(BASE64URL_NOPAD.encode(&bytes[..]));
    write_line(output, &secret).await
}

/// Encode the JSON document read from `input`
async fn handle_encode<R: AsyncRead + Unpin, W: AsyncWrite + Unpin>(
    codec: &Codec,
    input: R,
    output: &mut W,
) -> Result<(), CliError> {
    let text = read_all(input).await?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    let token = codec.encode(&value)?;
    debug!(json_len = text.len(), token_len = token.len(), "encoded document");

    write_line(output, token.as_str()).await
}

/// Decode `token` and print the JSON document it carries
async fn handle_decode<W: AsyncWrite + Unpin>(
    codec: &Codec,
    token: &str,
    pretty: bool,
    output: &mut W,
) -> Result<(), CliError> {
    let value = codec.decode_value(token)?;

    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    write_line(output, &text).await
}

/// Issue an email verification link
async fn handle_link<W: AsyncWrite + Unpin>(
    codec: &Codec,
    email: &str,
    base_url: &str,
    source_address: Option<IpAddr>,
    now: Timestamp,
    output: &mut W,
) -> Result<(), CliError> {
    let claim = VerificationClaim::new(email, source_address, now)?;
    let token = codec.encode(&claim)?;
    let link = make_link(base_url, &token);

    info!(email = %claim.email, issued_at = %claim.issued_at, "issued verification link");

    write_line(output, &link).await
}

/// Check an email verification link, printing the verified claim
async fn handle_verify<W: AsyncWrite + Unpin>(
    codec: &Codec,
    link: &str,
    max_age: SignedDuration,
    now: Timestamp,
    output: &mut W,
) -> Result<(), CliError> {
    let claim: VerificationClaim = codec.decode(token_from_link(link))?;
    claim.check_age(now, max_age)?;

    info!(email = %claim.email, issued_at = %claim.issued_at, "verified");

    write_line(output, &serde_json::to_string(&claim)?).await
}

async fn read_all<R: AsyncRead + Unpin>(mut input: R) -> Result<String, CliError> {
    let mut text = String::new();
    input.read_to_string(&mut text).await?;
    Ok(text)
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<(), CliError> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

/// Events from the codec itself, as opposed to this binary (whose crate is also named `urlcrypt`)
const CODEC_LOG_TARGET: &str = "urlcrypt::codec";

fn log_filters(cli: &Cli) -> tracing_subscriber::filter::Targets {
    use tracing::Level;

    let verbosity = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, 2..) => Level::TRACE,
    };

    // Decode failure details are only interesting when asked for
    let codec_verbosity = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::DEBUG,
        (false, 2..) => Level::TRACE,
    };

    tracing_subscriber::filter::Targets::new()
        .with_target(CODEC_LOG_TARGET, codec_verbosity)
        .with_default(verbosity)
}

fn enable_logging(cli: &Cli) {
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // stdout carries tokens and documents only
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(log_filters(cli));

    tracing_subscriber::registry().with(fmt_layer).init();
}
