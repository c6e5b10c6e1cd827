//! `paramstore-demo` entry point.
//!
//! Solves `kx + b = 0` with `k` and `b` taken from parameters. The values are
//! merged with the usual precedence:
//! 1. Compiled-in defaults
//! 2. Configuration file (`--load-ini <path>`, otherwise the first of
//!    `/etc/paramstore-demo.conf` and `~/.paramstore-demo.conf` that exists)
//! 3. Command-line flags (`--k=2`, `--greeter=Hello`)
//!
//! `--save-ini <path>` writes the merged values back out and `--help` lists
//! every flag with its default. Errors are reported through `eyre` at this
//! boundary; the library itself only returns `ConfigError`.

use eyre::{Report, Result as EyreResult};
use paramstore::startup::{self, Startup};
use paramstore::{Parameter, ParameterGroup, ParameterStore, Result as ParamResult};
use tracing_subscriber::EnvFilter;

/// Configuration files tried when `--load-ini` is absent.
const CONFIG_CANDIDATES: &[&str] = &["/etc/paramstore-demo.conf", "~/.paramstore-demo.conf"];

/// Application entry point.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn main() -> EyreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut store = build_store().map_err(Report::from)?;
    match startup::read_configuration(&mut store, CONFIG_CANDIDATES, std::env::args_os())
        .map_err(Report::from)?
    {
        Startup::Help(text) => print_help(&text),
        Startup::Run => solve(&store).map_err(Report::from),
    }
}

/// Declares every group the demo reads.
fn build_store() -> ParamResult<ParameterStore> {
    let mut store =
        ParameterStore::new("All parameters for your program").with_program_name("paramstore-demo");
    startup::add_general_options(&mut store)?;
    store
        .with_group(
            ParameterGroup::new("Input")
                .with_description("Input parameters")
                .with(Parameter::<f64>::with_default("k", "Value of k", 1.23))?
                .with(Parameter::<f64>::with_default("b", "Value of b", 9.87))?,
        )?
        .with_group(
            ParameterGroup::new("Interface")
                .with_description("User interface parameters")
                .with(Parameter::<String>::with_default(
                    "greeter",
                    "Greeting printed on start",
                    "Hi, user.",
                ))?,
        )
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "keeps both match arms in main on the same result type"
)]
fn print_help(text: &str) -> EyreResult<()> {
    println!("{text}");
    Ok(())
}

/// Prints the greeting and the root of `kx + b = 0`.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
#[expect(clippy::float_arithmetic, reason = "solving the equation is the point")]
fn solve(store: &ParameterStore) -> ParamResult<()> {
    let greeter = store.group("Interface")?.get::<String>("greeter")?;
    let input = store.group("Input")?;
    let k = input.get::<f64>("k")?;
    let b = input.get::<f64>("b")?;

    println!("{greeter}");
    println!("kx+b=0");
    if k == 0.0 {
        println!("x is any number");
    } else {
        println!("x = {}", -b / k);
    }
    Ok(())
}
