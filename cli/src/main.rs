#![deny(unsafe_code)]

use std::io::Write;

use anyhow::Result;
use log::{debug, error, info, warn};

mod cli;

use cli::Arguments;
use ssllabs::{CheckStatus, Config, Grade, ScanRequest, Thresholds, client::Host};

/// Write the grade of the first endpoint and map it to a check status
///
/// The raw grade is written before it is looked up, so an unknown grade is
/// still shown next to the UNKNOWN status.
fn report(host: &Host, thresholds: Thresholds, out: &mut impl Write) -> Result<CheckStatus> {
    let raw = host.first_grade()?;
    write!(out, "{}", raw)?;
    out.flush()?;

    let grade: Grade = raw.parse()?;
    let status = thresholds.evaluate(grade);
    info!(
        "{} - grade {} (warning: {}, critical: {})",
        status, grade, thresholds.warning, thresholds.critical
    );
    Ok(status)
}

async fn check(arguments: &Arguments) -> Result<CheckStatus> {
    let mut config = match Config::load(&arguments.config) {
        Ok(config) => config,
        Err(error) => {
            warn!("Failed to load configuration: {}", error);
            Config::default()
        }
    };
    if let Some(url) = &arguments.api_url {
        config.api.url = url.clone();
    }
    debug!("Configuration: {:?}", config);

    let thresholds = Thresholds::new(arguments.warning, arguments.critical);
    if thresholds.is_inverted() {
        warn!(
            "Warning threshold ({}) is worse than critical ({}), WARNING will never be reported",
            thresholds.warning, thresholds.critical
        );
    }

    let client = config.client()?;
    let request = ScanRequest::new(&arguments.host)
        .publish(arguments.publish)
        .use_cache(arguments.use_cache);

    let host = request.run(&client, &config.polling).await?;
    if let Some(tested) = host.tested_at() {
        info!("Assessment of '{}' completed at {}", host.host, tested);
    }

    report(&host, thresholds, &mut std::io::stdout())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let status = match cli::init() {
        Ok(arguments) => match check(&arguments).await {
            Ok(status) => status,
            Err(err) => {
                error!("{}", err);
                CheckStatus::Unknown
            }
        },
        Err(usage) => {
            print!("{}", usage.message);
            usage.status
        }
    };

    std::process::exit(status.code());
}
