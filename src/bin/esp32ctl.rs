extern crate structopt;
#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_term;
use clap::AppSettings;
use esp32ctl::{run_sequence, Command, Result, DEFAULT_DEVICE_URL, DEMO_SEQUENCE};
use slog::{Drain, Level};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(raw(global_settings = "&[AppSettings::VersionlessSubcommands]"))]
struct Opt {
    /// WebSocket address of the device
    #[structopt(short = "u", long = "url", raw(default_value = "DEFAULT_DEVICE_URL"))]
    url: String,
    /// Log every frame at debug level
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
    #[structopt(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(StructOpt)]
enum Cmd {
    /// Set the output value (0-255)
    #[structopt(name = "set-value")]
    SetValue { value: u8 },
    /// Ask the device for its status
    #[structopt(name = "get-status")]
    GetStatus,
    /// Drive the enable pin high
    #[structopt(name = "enable")]
    Enable,
    /// Drive the enable pin low
    #[structopt(name = "disable")]
    Disable,
    /// Send several commands in order, one connection each
    #[structopt(name = "run")]
    Run {
        /// set-value=<0-255>, get-status, enable, disable or enable=<bool>
        #[structopt(raw(required = "true"))]
        commands: Vec<Command>,
    },
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let level = if opt.verbose { Level::Debug } else { Level::Info };
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    let log = slog::Logger::root(
        drain,
        o!("version" => env!("CARGO_PKG_VERSION"), "url" => opt.url.clone()),
    );
    let commands = match opt.cmd {
        None => DEMO_SEQUENCE.to_vec(),
        Some(Cmd::SetValue { value }) => vec![Command::SetValue(value)],
        Some(Cmd::GetStatus) => vec![Command::GetStatus],
        Some(Cmd::Enable) => vec![Command::Enable(true)],
        Some(Cmd::Disable) => vec![Command::Enable(false)],
        Some(Cmd::Run { commands }) => commands,
    };
    run_sequence(&opt.url, &commands, &log, |_, res| println!("{}", res))
}
