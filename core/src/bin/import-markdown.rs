use blog_core::import::{import_markdown, ImportArgs, ImportError};
use blog_core::{ClientConfig, PostApiClient, RequestOptions};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), ImportError> {
    install_tracing();
    let args = ImportArgs::parse();

    let config = ClientConfig::from_env()?;
    let api = PostApiClient::from_config(&config)?;
    let post = import_markdown(&api, &args, &RequestOptions::default()).await?;

    println!("Imported post:");
    println!("  id: {}", post.id);
    println!("  title: {}", post.title);
    println!("  slug: {}", post.slug);
    println!("  status: {}", post.status.as_str());
    println!("  tags: {}", post.tags.join(", "));

    Ok(())
}
