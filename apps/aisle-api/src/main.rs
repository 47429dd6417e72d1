use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = aisle_api::Args::parse();
	aisle_api::run(args).await
}
