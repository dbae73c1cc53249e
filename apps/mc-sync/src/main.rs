use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mc_sync::Args::parse();

	mc_sync::run(args).await
}
