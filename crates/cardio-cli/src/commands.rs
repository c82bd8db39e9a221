use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{CellAlignment, Table};
use tracing::info;

use cardio_cli::pipeline::{RunOptions, run_pipeline};
use cardio_cli::types::RunResult;
use cardio_model::{BandTable, IdStrategy, PipelineConfig};

use crate::cli::{BandsArgs, IdStrategyArg, RunArgs};
use crate::summary::{align_column, apply_table_style, header_cell};

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args)?;
    let options = RunOptions {
        output_dir: args.output_dir.clone(),
        write_warehouse: !args.no_warehouse,
        dry_run: args.dry_run,
        min_score: args.min_score,
    };
    run_pipeline(&args.input, &config, &options)
}

pub fn bands(args: &BandsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let derive = &config.derive;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Band"),
        header_cell("Lower (incl.)"),
        header_cell("Upper (excl.)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    add_band_rows(&mut table, "age_years", &derive.age_bands);
    add_band_rows(&mut table, "bmi", &derive.bmi_bands);
    add_band_rows(&mut table, "ap_hi", &derive.bp_bands);
    println!("{table}");
    Ok(())
}

pub fn default_config() -> Result<()> {
    let text = PipelineConfig::default()
        .to_toml_string()
        .context("serialize default configuration")?;
    print!("{text}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = PipelineConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Fold command-line flags into the loaded configuration.
fn apply_overrides(config: &mut PipelineConfig, args: &RunArgs) -> Result<()> {
    if let Some(separator) = args.separator {
        config.ingest.separator = Some(separator);
    }
    match (args.id_strategy, args.id_salt.as_ref()) {
        (Some(IdStrategyArg::Sequential), Some(_)) => {
            bail!("--id-salt only applies to --id-strategy content-hash")
        }
        (Some(IdStrategyArg::Sequential), None) => {
            config.derive.id_strategy = IdStrategy::Sequential;
        }
        (Some(IdStrategyArg::ContentHash), Some(salt)) | (None, Some(salt)) => {
            config.derive.id_strategy = IdStrategy::ContentHash { salt: salt.clone() };
        }
        (Some(IdStrategyArg::ContentHash), None) => {
            if !matches!(config.derive.id_strategy, IdStrategy::ContentHash { .. }) {
                bail!("--id-strategy content-hash requires --id-salt or a configured salt");
            }
        }
        (None, None) => {}
    }
    if let Some(min_score) = args.min_score {
        if !(0.0..=100.0).contains(&min_score) {
            bail!("--min-score {min_score} is outside 0-100");
        }
        config.quality.score_threshold = Some(min_score);
    }
    config.validate().context("invalid configuration")?;
    Ok(())
}

fn add_band_rows(table: &mut Table, name: &str, bands: &BandTable) {
    for band in bands.bands() {
        let upper = band
            .upper
            .map_or_else(|| "-".to_string(), |upper| upper.to_string());
        table.add_row(vec![
            name.to_string(),
            band.label.clone(),
            band.lower.to_string(),
            upper,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn run_args() -> RunArgs {
        RunArgs {
            input: PathBuf::from("cardio.csv"),
            output_dir: None,
            config: None,
            separator: None,
            id_strategy: None,
            id_salt: None,
            no_warehouse: false,
            dry_run: false,
            min_score: None,
        }
    }

    #[test]
    fn salt_alone_selects_content_hash() {
        let mut config = PipelineConfig::default();
        let args = RunArgs {
            id_salt: Some("pepper".to_string()),
            ..run_args()
        };
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(
            config.derive.id_strategy,
            IdStrategy::ContentHash {
                salt: "pepper".to_string()
            }
        );
    }

    #[test]
    fn content_hash_without_any_salt_is_rejected() {
        let mut config = PipelineConfig::default();
        let args = RunArgs {
            id_strategy: Some(IdStrategyArg::ContentHash),
            ..run_args()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }

    #[test]
    fn configured_salt_is_kept() {
        let mut config = PipelineConfig::default();
        config.derive.id_strategy = IdStrategy::ContentHash {
            salt: "from-file".to_string(),
        };
        let args = RunArgs {
            id_strategy: Some(IdStrategyArg::ContentHash),
            ..run_args()
        };
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(
            config.derive.id_strategy,
            IdStrategy::ContentHash {
                salt: "from-file".to_string()
            }
        );
    }

    #[test]
    fn min_score_becomes_report_threshold() {
        let mut config = PipelineConfig::default();
        let args = RunArgs {
            min_score: Some(90.0),
            separator: Some(';'),
            ..run_args()
        };
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.quality.score_threshold, Some(90.0));
        assert_eq!(config.ingest.separator, Some(';'));

        let args = RunArgs {
            min_score: Some(140.0),
            ..run_args()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
