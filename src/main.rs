use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

/// Browse followed Twitch channels from rofi, dmenu or fzf.
#[derive(Parser, Debug)]
#[command(name = "twitch-menu", version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Config file (default: ~/.config/twitch-menu/config.yaml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Menu program: rofi, dmenu or fzf
    #[arg(short, long, value_name = "PROGRAM")]
    menu: Option<String>,

    /// Player command, split on whitespace; %URL% is replaced with the
    /// channel, video or clip url. Use `player.command` in the config file for
    /// arguments containing spaces.
    #[arg(long, value_name = "COMMAND")]
    player: Option<String>,
}

impl Cli {
    fn into_options(self) -> twitch_menu::app::Options {
        twitch_menu::app::Options {
            config_file: self.config,
            menu: self.menu,
            player: self
                .player
                .map(|cmd| cmd.split_whitespace().map(str::to_string).collect()),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    twitch_menu::app::init_logging(cli.verbose);

    // Failures were already logged and shown by the app.
    if twitch_menu::run(cli.into_options()).is_err() {
        std::process::exit(1);
    }
}
