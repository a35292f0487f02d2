use eyre::{Context, Result};
use nl2sql::backend::new_oracle;
use nl2sql::cli::Command;
use nl2sql::config::{Configuration, init_logger, verbose};
use nl2sql::generate::SqlGenerator;
use nl2sql::models::{GenerationRequest, SamplingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    let config = cmd.get_config()?;
    Configuration::init(config)?;
    let config = Configuration::instance();

    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    let question = match cmd.question() {
        Some(question) => question.to_string(),
        None => eyre::bail!("no question provided"),
    };

    let schema_path = match cmd.schema() {
        Some(path) => path,
        None => eyre::bail!("no schema file provided, use --schema <PATH>"),
    };
    let schema_text = std::fs::read_to_string(schema_path)
        .wrap_err(format!("reading schema file {}", schema_path))?;
    if schema_text.trim().is_empty() {
        eyre::bail!("schema file {} is empty", schema_path);
    }

    verbose!("[+] Initializing backend...");
    let oracle = new_oracle(&config.backend)?;

    let generator = SqlGenerator::new(oracle)
        .with_sampling(SamplingConfig::from(&config.generation))
        .from_config(&config.pipeline);

    verbose!("[+] Generating SQL...");
    let result = generator
        .generate_sql(&GenerationRequest::new(question, schema_text))
        .await?;

    println!("{}", result.sql);
    if cmd.show_raw() {
        eprintln!("\n=== Raw model output ===\n{}", result.raw_output);
    }

    Ok(())
}
