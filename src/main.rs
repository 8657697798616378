//! query-persist command line
//!
//! Runs the codec outside the browser: inspect what a store would put in
//! the URL, or what a shared link hydrates to.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::io::Read;
    use std::process::ExitCode;

    use clap::{Parser, Subcommand};
    use serde_json::Value;

    use query_persist::codec::{flatten_with, unflatten_with};
    use query_persist::{
        CodecConfig, FlatMap, MalformedPolicy, MemoryLocation, MemoryStorage, PersistStorage,
        Result,
    };

    #[derive(Parser, Debug)]
    #[command(name = "query-persist", version, about = "Store state <-> URL query codec")]
    struct Cli {
        /// Path segment separator
        #[arg(long, global = true, default_value = ".")]
        delimiter: String,

        /// Fail on malformed input instead of treating it as absent
        #[arg(long, global = true)]
        strict: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Nested JSON object -> flat path map
        Flatten {
            /// JSON text; read from stdin when omitted
            json: Option<String>,
        },
        /// Flat path map -> nested JSON object
        Unflatten { json: Option<String> },
        /// Envelope JSON -> URL with the store parameter set
        Encode {
            /// Store name, used as the URL parameter
            #[arg(short, long)]
            name: String,
            /// Page URL to start from
            #[arg(long, default_value = "/")]
            href: String,
            envelope: Option<String>,
        },
        /// URL -> hydrated envelope JSON (or `null`)
        Decode {
            #[arg(short, long)]
            name: String,
            href: Option<String>,
        },
    }

    fn input(arg: Option<String>) -> std::io::Result<String> {
        match arg {
            Some(text) => Ok(text),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text.trim_end().to_string())
            }
        }
    }

    fn execute(cli: Cli) -> Result<String> {
        let config = CodecConfig {
            delimiter: cli.delimiter,
            on_malformed: if cli.strict {
                MalformedPolicy::Fail
            } else {
                MalformedPolicy::TreatAsAbsent
            },
            ..CodecConfig::default()
        };

        match cli.command {
            Command::Flatten { json } => {
                let value: Value = serde_json::from_str(&input(json)?)?;
                let flat = flatten_with(&value, &config.delimiter)?;
                Ok(serde_json::to_string_pretty(&flat)?)
            }
            Command::Unflatten { json } => {
                let flat: FlatMap = serde_json::from_str(&input(json)?)?;
                let value = unflatten_with(&flat, &config.delimiter)?;
                Ok(serde_json::to_string_pretty(&value)?)
            }
            Command::Encode {
                name,
                href,
                envelope,
            } => {
                let adapter = PersistStorage::with_config(
                    MemoryStorage::new(),
                    MemoryLocation::from_href(&href),
                    config,
                );
                adapter.set_item(&name, &input(envelope)?)?;
                Ok(adapter.location().href())
            }
            Command::Decode { name, href } => {
                let adapter = PersistStorage::with_config(
                    MemoryStorage::new(),
                    MemoryLocation::from_href(&input(href)?),
                    config,
                );
                Ok(adapter
                    .get_item(&name)?
                    .unwrap_or_else(|| "null".to_string()))
            }
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let cli = Cli::parse();
        log::debug!("{:?}", cli);

        match execute(cli) {
            Ok(output) => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is bindings::start, this is just to satisfy the compiler
}
