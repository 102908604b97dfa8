use anyhow::{Context, Result, bail};
use dapr_sdk::serializers::duration::{self, ElapsedTime};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: dapr-duration <decode TEXT | encode SECONDS>";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next();
    let value = args.next();

    match (command.as_deref(), value) {
        (Some("decode"), Some(text)) => {
            let elapsed = duration::decode(&text)?;
            debug!(input = %text, total_seconds = %elapsed.total_seconds(), "Decoded duration");
            println!(
                "days={} hours={} minutes={} seconds={} total_seconds={}",
                elapsed.days,
                elapsed.hours,
                elapsed.minutes,
                elapsed.seconds,
                elapsed.total_seconds()
            );
        }
        (Some("encode"), Some(raw)) => {
            let seconds: u64 = raw
                .parse()
                .with_context(|| format!("invalid number of seconds: '{raw}'"))?;
            println!("{}", duration::encode(ElapsedTime::from_secs(seconds)));
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
