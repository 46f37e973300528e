use il_cli::{init_tracing, Cli, Parser};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.execute().await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<il_core::Error>() {
            Some(core) => {
                eprintln!("{}", serde_json::to_string_pretty(&core.to_problem())?);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}
