use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use rednote::commands::write;
use rednote::llm;

#[derive(Parser, Debug)]
#[command(
    name = "rednote",
    version,
    about = "Xiaohongshu copywriting assistant for the terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate five titles and a body paragraph for a topic
    Write {
        /// Topic to write about, e.g. 健康饮食 or 旅行攻略
        #[arg(value_name = "TOPIC")]
        topic: String,
        /// Chat model to use
        #[arg(long, value_name = "MODEL", default_value = llm::DEFAULT_MODEL)]
        model: String,
        /// Print a plain summary instead of the two-column view
        #[arg(long, default_value_t = false)]
        plain: bool,
    },
    /// Manage the API key for the chat endpoint
    Key {
        /// Store a new API key in the local auth file
        #[arg(long, value_name = "KEY", conflicts_with = "clear")]
        set: Option<String>,
        /// Remove the stored API key from the local auth file
        #[arg(long, conflicts_with = "test")]
        clear: bool,
        /// Verify the configured API key by calling the API
        #[arg(long, conflicts_with = "clear")]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Write {
            topic,
            model,
            plain,
        } => {
            write::run(&topic, &model, plain).await?;
        }
        Command::Key { set, clear, test } => handle_key_command(set, clear, test).await?,
    }

    Ok(())
}

async fn handle_key_command(set: Option<String>, clear: bool, test: bool) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        llm::store_api_key(&key)?;
        println!("Stored API key in the local auth file.");
        action_taken = true;
    }

    if clear {
        let removed = llm::clear_api_key()?;
        if removed {
            println!("Removed the stored API key.");
        } else {
            println!("No API key found in the auth file.");
        }
        action_taken = true;
    }

    if test {
        let Some((key, source)) = llm::lookup_api_key()? else {
            bail!(
                "No API key configured. Set {} or run `rednote key --set <KEY>`.",
                llm::API_KEY_ENV
            );
        };
        llm::healthcheck_api_key(&key).await?;
        println!("API key from the {} is valid.", source.description());
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, or --test.");
    }
    Ok(())
}
