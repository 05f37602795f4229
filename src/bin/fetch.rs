use clap::Parser;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Parser)]
#[command(name = "warden-fetch")]
#[command(about = "Fetch a URL over HTTP/1.0 and print the body")]
struct Args {
    /// URL of the form http://host[:port]/path
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let response = warden::client::fetch(&args.url).await?;

    eprintln!("{} {}", response.status, response.reason);

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&response.body).await?;
    stdout.flush().await?;

    if !(200..300).contains(&response.status) {
        std::process::exit(1);
    }

    Ok(())
}
