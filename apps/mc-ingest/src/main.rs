use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mc_ingest::Args::parse();

	mc_ingest::run(args).await
}
