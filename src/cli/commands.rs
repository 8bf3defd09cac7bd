// CLI command implementations
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::config::{Commands, Config};
use crate::cli::output::{self, ViewOptions};
use crate::format::TagFormat;
use crate::mapping::{HttpMappingSource, MappingTable};
use crate::store::{DumpFile, TagStore};
use crate::transcode;
use crate::translate::{copy_metadata, CopySummary, Translator};

/// Dispatch the parsed command line
pub fn run(config: &Config) -> Result<()> {
    match &config.command {
        Commands::Copy { input, output } => command_copy(config, input, output),
        Commands::View {
            path,
            raw,
            show_skipped,
            include_replaygain,
        } => command_view(
            path,
            &ViewOptions {
                raw: *raw,
                show_skipped: *show_skipped,
                include_replaygain: *include_replaygain,
            },
        ),
        Commands::Del { path, tag } => command_del(path, tag.as_deref()),
        Commands::Convert {
            input,
            output,
            metadata_source,
            keep_input,
            run_metacopy,
        } => command_convert(
            config,
            input,
            output.as_deref(),
            metadata_source.as_deref(),
            *keep_input,
            *run_metacopy,
        ),
        Commands::Mappings => command_mappings(config),
    }
}

/// Build the mapping table from the configured cache/source
fn build_table(config: &Config) -> Result<MappingTable> {
    let source = match &config.mappings_url {
        Some(url) => HttpMappingSource::new(url.clone()),
        None => HttpMappingSource::default(),
    };
    MappingTable::load(&source, config.mappings_cache.as_deref())
        .context("building the mapping table")
}

fn open_target(path: &Path) -> Result<DumpFile> {
    if path.exists() {
        DumpFile::open(path).with_context(|| format!("opening '{}'", path.display()))
    } else {
        let format = DumpFile::infer_format(path)
            .with_context(|| format!("inferring tag schema for '{}'", path.display()))?;
        DumpFile::open_or_create(path, format).map_err(Into::into)
    }
}

fn report(summary: &CopySummary) {
    println!("{} tags applied, {} skipped", summary.applied, summary.skipped.len());
    for (key, reason) in &summary.skipped {
        println!("  skipped {key:?}: {reason}");
    }
}

fn command_copy(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let table = build_table(config)?;
    let translator = Translator::new(&table);

    let source =
        DumpFile::open(input).with_context(|| format!("opening '{}'", input.display()))?;
    let mut target = open_target(output)?;

    info!(
        "copying metadata: '{}' -> '{}'",
        input.display(),
        output.display()
    );
    let summary = copy_metadata(&translator, &source, &mut target)?;
    report(&summary);
    Ok(())
}

fn command_view(path: &Path, options: &ViewOptions) -> Result<()> {
    let file = DumpFile::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    output::view_dump(&file.dump, options);
    Ok(())
}

fn command_del(path: &Path, tag: Option<&str>) -> Result<()> {
    let mut file = DumpFile::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    let Some(tag) = tag else {
        output::view_dump(&file.dump, &ViewOptions { raw: true, ..ViewOptions::default() });
        return Ok(());
    };

    match file.remove(tag) {
        Some(value) => {
            info!("deleting {tag:?} (was {})", output::format_value(&value));
            file.save()?;
        }
        None => info!("{tag:?} not in '{}'", path.display()),
    }
    Ok(())
}

fn command_convert(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    metadata_source: Option<&Path>,
    keep_input: bool,
    run_metacopy: bool,
) -> Result<()> {
    if !input.is_file() {
        bail!("input file '{}' does not exist", input.display());
    }
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("m4a"),
    };

    println!("'{}' -> '{}'", input.display(), output.display());
    transcode::encode(input, &output, transcode::DEFAULT_CODEC)?;

    if run_metacopy {
        let source_path: PathBuf = match metadata_source {
            Some(path) => path.to_path_buf(),
            None => DumpFile::sidecar_path(input),
        };
        if source_path.is_file() {
            let table = build_table(config)?;
            let translator = Translator::new(&table);
            let source = DumpFile::open(&source_path)?;
            let target_path = DumpFile::sidecar_path(&output);
            let mut target = DumpFile::open_or_create(&target_path, TagFormat::Mp4)?;
            let summary = copy_metadata(&translator, &source, &mut target)?;
            report(&summary);
        } else {
            info!(
                "no tag dump at '{}'; conversion done without metadata copy",
                source_path.display()
            );
        }
    }

    if !keep_input {
        fs::remove_file(input)?;
    }
    Ok(())
}

fn command_mappings(config: &Config) -> Result<()> {
    let table = build_table(config)?;
    println!("{} labels", table.len());
    for (lbl, entry) in table.labels() {
        let keys: Vec<String> = entry
            .formats()
            .map(|(format, key)| format!("{format}={key:?}"))
            .collect();
        println!("{lbl}: {}", keys.join(", "));
    }
    Ok(())
}
