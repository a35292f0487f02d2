use clap::Parser;
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"Generate a SQL query from a natural language question, scoped to a schema file

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/nl2sql/config.toml
    * $HOME/.config/nl2sql/config.toml
    * $HOME/.nl2sql.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Natural language question to convert into SQL
    question: Option<String>,

    /// Path to a file containing the schema definition (DDL)
    #[arg(short, long, value_name = "PATH")]
    schema: Option<String>,

    /// Print the raw model output after the generated SQL
    #[arg(long)]
    show_raw: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        Ok(load_configuration(config_path.as_str()).wrap_err("loading configuration")?)
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn show_raw(&self) -> bool {
        self.show_raw
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
