use clap::Parser;
use voice_map::adapters::speech::{DisabledRecognizer, LineRecognizer};
use voice_map::domain::ports::{MapSurface, SpeechSource};
use voice_map::utils::error::ErrorSeverity;
use voice_map::utils::{logger, validation::Validate};
use voice_map::{build_default_app, CliArgs, DefaultVoiceMap, VoiceMapError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting voice-map");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(e);
    }

    let mut app = match build_default_app(&config) {
        Ok(app) => app,
        Err(e) => exit_with(e),
    };

    app.initialize().await;

    let result = if config.speech.enabled {
        let mut source = LineRecognizer::stdin(config.speech.alternative_separator.clone());
        run(&mut app, &mut source).await
    } else {
        run(&mut app, &mut DisabledRecognizer).await
    };

    let viewport = app.map().viewport();
    tracing::info!(
        "👋 Stopped at {} @ z{} with {} marker(s)",
        viewport.center,
        viewport.zoom,
        app.map().markers().len()
    );

    if let Err(e) = result {
        exit_with(e);
    }
    Ok(())
}

async fn run<S: SpeechSource>(app: &mut DefaultVoiceMap, source: &mut S) -> voice_map::Result<()> {
    tokio::select! {
        result = app.listen(source) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

fn exit_with(e: VoiceMapError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
