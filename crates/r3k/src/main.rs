mod cli;
mod tasks;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// set the global subscriber at the requested trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        // `r3k pull --user-agent <name email> --output <dir>`: download raw filings
        Pull {
            user_agent,
            output,
            replace_existing,
            delay_ms,
        } => {
            let user_agent = tasks::user_agent(user_agent)?;
            tasks::pull(&user_agent, &output, replace_existing, delay_ms, tui).await?;
        }

        // `r3k parse --input <dir> --output <dir>`: raw filings to holdings
        Parse {
            input,
            output,
            replace_existing,
            jobs,
        } => {
            tasks::parse(&input, &output, replace_existing, jobs, tui).await?;
        }
    }

    Ok(())
}
