mod config;
mod logger;

use self::config::{
    Config,
    Severity,
};
use anyhow::{
    ensure,
    Context,
};
use ascii2d::{
    ItemSource,
    SearchMode,
    SearchResult,
    Url,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    error,
    info,
    warn,
};

#[derive(argh::FromArgs)]
#[argh(description = "A tool to look up images on ascii2d")]
struct Options {
    #[argh(positional, description = "an image url or a path to an image file")]
    query: String,

    #[argh(
        option,
        long = "mode",
        default = "SearchMode::Color",
        description = "the ranking mode, 'color' or 'bovw'"
    )]
    mode: SearchMode,

    #[argh(switch, description = "print the results as json")]
    json: bool,

    #[argh(option, description = "the path to a config file")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    logger::setup().context("failed to initialize logger")?;

    let config = match options.config.as_deref() {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    tokio_rt.block_on(async_main(options, config))
}

/// Load and validate a config.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    info!("loading '{}'", path.display());
    let config = Config::load_from_path(path)?;

    let mut error_count = 0;
    for message in config.validate() {
        match message.severity() {
            Severity::Warn => {
                warn!("config validation warning: {}", message.error());
            }
            Severity::Error => {
                error!("config validation error: {}", message.error());
                error_count += 1;
            }
        }
    }

    ensure!(
        error_count == 0,
        "config validation failed with {error_count} errors"
    );

    Ok(config)
}

async fn async_main(options: Options, config: Config) -> anyhow::Result<()> {
    let base_url = match config.base_url {
        Some(base_url) => base_url,
        None => Url::parse(ascii2d::DEFAULT_BASE_URL)?,
    };
    let client = match config.user_agent.as_deref() {
        Some(user_agent) => ascii2d::Client::from_parts(base_url, Some(user_agent))
            .context("failed to create client")?,
        None => ascii2d::Client::with_base_url(base_url),
    };

    info!("searching...");
    let result = match Url::parse(&options.query) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => client
            .search_by_url(url.as_str(), options.mode)
            .await
            .context("failed to search by url")?,
        _ => client
            .search_by_file(Path::new(&options.query), options.mode)
            .await
            .with_context(|| format!("failed to search by file '{}'", options.query))?,
    };

    if options.json {
        let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{json}");
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &SearchResult) {
    println!("Url: {}", result.url);
    if result.items.is_empty() {
        println!("No Results");
    }

    for (i, item) in result.items.iter().enumerate() {
        println!("{})", i + 1);
        println!("Hash: {}", item.hash);
        println!(
            "Image: {}x{} {} ({} bytes)",
            item.width, item.height, item.file_type, item.file_size
        );
        if let Some(thumbnail_url) = item.thumbnail_url.as_ref() {
            println!("Thumbnail: {thumbnail_url}");
        }

        match item.source.as_ref() {
            Some(ItemSource::Known(source)) => {
                println!("Source: {} '{}'", source.kind, source.title);
                println!("Source Url: {}", source.url);
                if let Some(author) = source.author.as_ref() {
                    println!("Author: {} ({})", author.name, author.url);
                }
            }
            Some(ItemSource::External(source)) => {
                println!("Source: {}", source.reference);
                println!("{}", source.content);
            }
            None => {}
        }

        println!();
    }
}
