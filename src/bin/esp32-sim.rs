extern crate structopt;
#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_term;
use esp32ctl::{DeviceServer, Result};
use slog::{Drain, Level};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Opt {
    #[structopt(long = "addr", default_value = "127.0.0.1:7777")]
    addr: String,
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let level = if opt.verbose { Level::Debug } else { Level::Info };
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    let log = slog::Logger::root(
        drain,
        o!("version" => env!("CARGO_PKG_VERSION"), "addr" => opt.addr.clone()),
    );
    info!(log, "Starting device simulator");
    let mut server = DeviceServer::bind(&opt.addr, log.clone())?;
    server.serve()?;

    Ok(())
}
