use anyhow::Context;
use clap::Parser;
use qsl_labels::config::toml_config::TomlConfig;
use qsl_labels::domain::model::TransformResult;
use qsl_labels::utils::error::{EtlError, ErrorSeverity};
use qsl_labels::utils::{logger, validation::Validate};
use qsl_labels::{CliConfig, EtlEngine, LabelConfig, LabelPipeline, LocalStorage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting qsl-labels");
    tracing::debug!("CLI config: {:?}", cli);

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)
                .and_then(|config| config.validate().map(|_| config))
                .unwrap_or_else(|e| fail(&e));
            Some(config)
        }
        None => None,
    };

    let config = LabelConfig::resolve(&cli.overrides(), file_config.as_ref())
        .unwrap_or_else(|e| fail(&e));
    tracing::info!(
        "Labels with up to {} QSOs, {} QSLs, from {} to {}",
        config.capacity,
        if config.via_manager { "manager" } else { "direct" },
        config.input_path,
        config.output_path
    );

    let pipeline = LabelPipeline::new(LocalStorage::default(), config)
        .context("failed to set up the ADIF field matchers")?;
    let engine = EtlEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("Dry run, no output will be written");
        match engine.preview().await {
            Ok(result) => print_summary(&result),
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            println!("Labels written to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn print_summary(result: &TransformResult) {
    println!("QSOs read:        {}", result.contact_count);
    println!("Labels built:     {}", result.label_count);
    println!("Labels to print:  {}", result.emitted_count);
    println!("Labels skipped:   {}", result.filtered_count);
    for row in &result.table.rows {
        let qsos = row[2..row.len() - 1]
            .chunks(6)
            .filter(|slot| !slot[0].is_empty())
            .count();
        println!("  {} {} ({} QSOs)", row[0], row[1], qsos);
    }
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "qsl-labels failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
