//! Converts Metal3 infrastructure resources between API versions, either as plain objects or
//! as `ConversionReview`s sent by the Kubernetes API server.
use std::{
    io::{Read, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use kube::core::conversion::ConversionReview;
use metal3_api::{ConvertObjectError, convert_object, try_convert_with};
use metal3_versioned::{SideChannel, SideChannelOptions, side_channel::OptionsError};
use serde_json::Value;
use snafu::{ResultExt, Snafu};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod yaml;

const LOG_ENV_VAR: &str = "METAL3_CONVERT_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("invalid side channel options"))]
    SideChannelOptions { source: OptionsError },

    #[snafu(display("failed to read input from {input}"))]
    ReadInput {
        source: std::io::Error,
        input: String,
    },

    #[snafu(display("failed to parse input documents"))]
    ParseDocuments { source: yaml::Error },

    #[snafu(display("failed to convert document {index}"))]
    ConvertDocument {
        source: ConvertObjectError,
        index: usize,
    },

    #[snafu(display("failed to write converted documents"))]
    WriteDocuments { source: yaml::Error },

    #[snafu(display("failed to parse conversion review"))]
    ParseReview { source: serde_json::Error },

    #[snafu(display("failed to write conversion review"))]
    WriteReview { source: serde_json::Error },

    #[snafu(display("failed to write to stdout"))]
    WriteToStdout { source: std::io::Error },
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    side_channel: SideChannelOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Converts all objects of a YAML or JSON stream and prints them as YAML.
    Object(ObjectArguments),

    /// Answers a `ConversionReview` and prints the response review as JSON.
    Review(InputArguments),
}

#[derive(Debug, Args)]
struct ObjectArguments {
    /// The apiVersion the objects are converted to, for example
    /// `infrastructure.cluster.x-k8s.io/v1beta1`.
    #[arg(long)]
    to: String,

    #[command(flatten)]
    input: InputArguments,
}

#[derive(Debug, Args)]
struct InputArguments {
    /// File to read from. Reads from stdin if not given.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl InputArguments {
    fn read(&self) -> Result<String, Error> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path).with_context(|_| ReadInputSnafu {
                input: path.display().to_string(),
            }),
            None => {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context(ReadInputSnafu { input: "stdin" })?;
                Ok(input)
            }
        }
    }
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    initialize_logging();

    let side_channel = SideChannel::new(cli.side_channel).context(SideChannelOptionsSnafu)?;
    let stdout = std::io::stdout().lock();

    match cli.command {
        Command::Object(arguments) => {
            let input = arguments.input.read()?;
            convert_documents(&input, &arguments.to, &side_channel, stdout)
        }
        Command::Review(arguments) => {
            let input = arguments.read()?;
            answer_review(&input, &side_channel, stdout)
        }
    }
}

/// Logs to stderr, so that stdout only carries converted documents.
fn initialize_logging() {
    let env_filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}

fn convert_documents<W: Write>(
    input: &str,
    desired_api_version: &str,
    side_channel: &SideChannel,
    writer: W,
) -> Result<(), Error> {
    let documents = yaml::read_documents(input).context(ParseDocumentsSnafu)?;
    debug!(documents = documents.len(), "read input documents");

    let converted = documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            convert_object(document, desired_api_version, side_channel)
                .context(ConvertDocumentSnafu { index })
        })
        .collect::<Result<Vec<Value>, _>>()?;

    yaml::write_documents(&converted, writer).context(WriteDocumentsSnafu)
}

fn answer_review<W: Write>(
    input: &str,
    side_channel: &SideChannel,
    mut writer: W,
) -> Result<(), Error> {
    let review: ConversionReview = serde_json::from_str(input).context(ParseReviewSnafu)?;
    let review = try_convert_with(review, side_channel);

    serde_json::to_writer_pretty(&mut writer, &review).context(WriteReviewSnafu)?;
    writeln!(writer).context(WriteToStdoutSnafu)
}
