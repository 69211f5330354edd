// Entrypoint for the critter CLI.
// - Keeps `main` small: set up logging, build the API client and hand it to
//   the shell.
// - Returns `anyhow::Result` so startup failures print and exit non-zero.

use std::io::{self, IsTerminal};

use critter_cli::api::ApiClient;
use critter_cli::logging;
use critter_cli::ui::{Console, ReaderInput, Shell, TerminalInput};
use tracing::info;

fn main() -> anyhow::Result<()> {
    logging::init_file_logging();

    // Base address from `CRITTER_API_URL`, or the public API by default.
    // See `config::Config::from_env`.
    let api = ApiClient::from_env()?;
    info!(base_url = %api.base_url(), "Starting shell");

    // A real keyboard gets the interactive prompt; piped input is read
    // line by line so scripts work too.
    if io::stdin().is_terminal() {
        Shell::new(api, Console::terminal()).run(&mut TerminalInput)?;
    } else {
        let mut input = ReaderInput::new(io::stdin().lock());
        Shell::new(api, Console::plain(io::stdout())).run(&mut input)?;
    }
    Ok(())
}
