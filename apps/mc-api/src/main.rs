use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mc_api::Args::parse();

	mc_api::run(args).await
}
