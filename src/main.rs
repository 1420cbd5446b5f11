use anyhow::Context;
use composer::config::ComposerConfig;
use composer::error;
use composer::logging::Logger;
use composer::options::{RunOptions, USAGE};
use composer::playback::ConsolePlayer;
use composer::{Composer, MenuSession, PhraseSequence};
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let options = RunOptions::parse(std::env::args().skip(1)).context("invalid command line")?;
    if options.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = ComposerConfig::load(options.config_path.as_deref())
        .context("failed to load configuration")?;
    config.apply_options(&options);
    init_logging(&config)?;

    println!("composer - phrase sequence editor");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    let sequence = PhraseSequence::from_phrases(config.melody.iter().cloned());
    log::info!("session started with {} phrases", sequence.len());

    let composer = Composer::new(sequence, ConsolePlayer::stdout()).with_indices(config.show_indices);
    let stdin = io::stdin();
    let mut session = MenuSession::new(composer, stdin.lock(), io::stdout());
    session.run().context("menu session failed")?;

    log::info!("session finished");
    Ok(())
}

fn init_logging(config: &ComposerConfig) -> anyhow::Result<()> {
    let mut logger = Logger::new(config.log_level);
    if let Some(path) = config.resolve_log_path().context("invalid log file path")? {
        logger = logger
            .with_file_output(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }
    logger.install().context("failed to install logger")
}
