use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use mvcc_store::{Config, Connection, Database, IsolationLevel};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum IsolationArg {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
}

impl From<IsolationArg> for IsolationLevel {
    fn from(arg: IsolationArg) -> Self {
        match arg {
            IsolationArg::ReadUncommitted => IsolationLevel::ReadUncommitted,
            IsolationArg::ReadCommitted => IsolationLevel::ReadCommitted,
            IsolationArg::RepeatableRead => IsolationLevel::RepeatableRead,
            IsolationArg::Snapshot => IsolationLevel::Snapshot,
            IsolationArg::Serializable => IsolationLevel::Serializable,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "A scripted walkthrough of the mvcc-store engine")]
struct Args {
    /// Isolation level new connections run under.
    #[clap(short, long, value_enum, default_value = "serializable")]
    isolation: IsolationArg,

    #[clap(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let db = Arc::new(Database::new(Config { default_isolation: args.isolation.into() }));
    info!("database started, default_isolation={:?}", args.isolation);

    let mut writer = Connection::new(db.clone());
    writer.begin()?;
    writer.set("a", "1")?;
    writer.set("b", "2")?;
    writer.commit()?;
    info!("wrote a=1, b=2 and committed");

    let mut reader = Connection::new(db.clone());
    reader.begin()?;
    info!("a = {:?}", reader.get("a")?);
    reader.delete("b")?;
    info!("b deleted within this transaction, sees b = {:?}", reader.get("b")?);
    reader.commit()?;

    let mut concurrent_a = Connection::new(db.clone());
    let mut concurrent_b = Connection::new(db.clone());
    concurrent_a.begin()?;
    concurrent_b.begin()?;
    concurrent_a.set("c", "from A")?;
    concurrent_b.set("c", "from B")?;
    concurrent_a.commit()?;
    match concurrent_b.commit() {
        Ok(()) => info!("both writers committed (no conflict detection at this isolation level)"),
        Err(err) => info!("second writer aborted on commit: {err}"),
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    use std::str::FromStr;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {} [{}] {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::from_str(level)?)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
