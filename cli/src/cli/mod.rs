use clap::{CommandFactory, Parser, error::ErrorKind};
use ssllabs::{CheckStatus, Grade};
use std::path::PathBuf;
use url::Url;

/// Minimum number of arguments (`-H host -w grade -c grade` in any form)
pub const MIN_ARGUMENTS: usize = 3;

#[derive(Parser, Debug, Clone)]
#[command(name = "check_ssllabs", author, version, about, long_about = None)]
pub struct Arguments {
    /// Enable Debugging
    #[clap(long, env, default_value_t = false)]
    pub debug: bool,

    /// Configuration file path
    #[clap(long, env = "SSLLABS_CONFIG", default_value = "./ssllabs.yml")]
    pub config: PathBuf,

    /// SSL Labs analyze endpoint (overrides the configuration)
    #[clap(long)]
    pub api_url: Option<Url>,

    /// Host to assess
    #[clap(short = 'H', long, value_name = "STRING")]
    pub host: String,

    /// Publish results at Qualys SSL Labs
    #[clap(short, long)]
    pub publish: bool,

    /// Accept cached results instead of starting a new assessment
    #[clap(short, long = "use-cache")]
    pub use_cache: bool,

    /// Grade at or worse than which the check is WARNING
    #[clap(short, long, value_name = "GRADE")]
    pub warning: Grade,

    /// Grade at or worse than which the check is CRITICAL
    #[clap(short, long, value_name = "GRADE")]
    pub critical: Grade,
}

/// Text to print instead of running the check
#[derive(Debug)]
pub struct Usage {
    /// Help, version or parse error, meant for stdout
    pub message: String,
    /// Exit status
    pub status: CheckStatus,
}

/// Parse the arguments and set up logging
pub fn init() -> Result<Arguments, Usage> {
    let arguments = parse(std::env::args_os().collect::<Vec<_>>())?;

    let log_level = match &arguments.debug {
        false => log::LevelFilter::Warn,
        true => log::LevelFilter::Debug,
    };

    env_logger::builder()
        .parse_default_env()
        .format_module_path(false)
        .filter_level(log_level)
        .init();

    Ok(arguments)
}

/// `--help` and `--version` are honoured on their own (exit OK); any other
/// invocation with too few arguments prints the help and is UNKNOWN.
fn parse(args: Vec<std::ffi::OsString>) -> Result<Arguments, Usage> {
    let count = args.len().saturating_sub(1);

    match Arguments::try_parse_from(args) {
        Ok(arguments) => Ok(arguments),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Err(Usage {
                message: err.render().to_string(),
                status: CheckStatus::Ok,
            })
        }
        Err(_) if count < MIN_ARGUMENTS => Err(Usage {
            message: Arguments::command().render_help().to_string(),
            status: CheckStatus::Unknown,
        }),
        Err(err) => Err(Usage {
            message: err.render().to_string(),
            status: CheckStatus::Unknown,
        }),
    }
}
