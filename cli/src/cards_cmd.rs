use crate::config::CliConfig;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Args;
use clap::Parser;
use clap::ValueEnum;
use lessoncraft_catalog_client::ClientConfig;
use lessoncraft_catalog_client::HttpCatalogClient;
use lessoncraft_catalog_filter::CatalogSearch;
use lessoncraft_catalog_filter::CatalogView;
use lessoncraft_catalog_filter::DURATION_PRESETS;
use lessoncraft_catalog_filter::FacetId;
use lessoncraft_catalog_filter::FilterEngine;
use lessoncraft_catalog_filter::FilterPatch;
use lessoncraft_catalog_filter::FilterState;
use lessoncraft_catalog_filter::MemoryCatalog;
use lessoncraft_catalog_filter::compile_query;
use lessoncraft_catalog_filter::run_engine;
use lessoncraft_catalog_protocol::Card;
use lessoncraft_catalog_protocol::CardId;
use lessoncraft_catalog_protocol::CardsResponse;
use lessoncraft_catalog_protocol::Logic;
use lessoncraft_catalog_protocol::PanelMode;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::warn;

/// Filter selection shared by `cards` and `params`.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Free text matched against card titles and descriptions.
    #[arg(long = "text", value_name = "TEXT")]
    pub text: Option<String>,

    /// Panel mode: `simple` applies `--logic` to every facet.
    #[arg(long = "mode", value_name = "MODE")]
    pub mode: Option<PanelMode>,

    /// Global logic (`any` or `all`).
    #[arg(long = "logic", value_name = "LOGIC")]
    pub logic: Option<Logic>,

    /// Method type: active, calm (alias passive) or aux. Repeatable.
    #[arg(long = "method-type", alias = "method", value_delimiter = ',')]
    pub method_types: Vec<String>,

    /// Bloom level. Repeatable.
    #[arg(long = "bloom", value_delimiter = ',')]
    pub bloom: Vec<String>,

    /// Age band: a1, a2 or a3. Repeatable.
    #[arg(long = "age", value_delimiter = ',')]
    pub age: Vec<String>,

    /// Work format: individual or group. Repeatable.
    #[arg(long = "work", value_delimiter = ',')]
    pub work: Vec<String>,

    /// 4K skill. Repeatable.
    #[arg(long = "skill", value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Lesson stage: start, core or final. Repeatable.
    #[arg(long = "stage", value_delimiter = ',')]
    pub stages: Vec<String>,

    /// Per-facet logic for advanced mode, e.g. `bloom=all`. Repeatable.
    #[arg(long = "logic-for", value_name = "FACET=LOGIC", value_parser = parse_logic_override)]
    pub logic_for: Vec<(FacetId, Logic)>,

    /// Maximum card duration in minutes.
    #[arg(long = "duration-max", value_name = "MINUTES")]
    pub duration_max: Option<u32>,

    /// Duration slider reading; the slider maximum means "no ceiling".
    #[arg(
        long = "duration-slider",
        value_name = "MINUTES",
        conflicts_with = "duration_max"
    )]
    pub duration_slider: Option<u32>,

    /// One of the preset ceilings: 3, 7, 15 or 40 minutes.
    #[arg(
        long = "duration-preset",
        value_name = "MINUTES",
        value_parser = parse_duration_preset,
        conflicts_with_all = ["duration_max", "duration_slider"]
    )]
    pub duration_preset: Option<u32>,
}

impl FilterArgs {
    pub fn to_patch(&self, slider_max: u32) -> FilterPatch {
        let mut patch = FilterPatch::new();
        if let Some(mode) = self.mode {
            patch = patch.mode(mode);
        }
        if let Some(logic) = self.logic {
            patch = patch.global_logic(logic);
        }
        if let Some(text) = &self.text {
            patch = patch.text(text.clone());
        }

        let selections = [
            (FacetId::MethodType, &self.method_types),
            (FacetId::Bloom, &self.bloom),
            (FacetId::Age, &self.age),
            (FacetId::WorkFormat, &self.work),
            (FacetId::Skills4k, &self.skills),
            (FacetId::LessonStage, &self.stages),
        ];
        for (facet, values) in selections {
            if !values.is_empty() {
                patch = patch.select(facet, values.iter().cloned());
            }
        }

        if !self.logic_for.is_empty() && self.mode != Some(PanelMode::Advanced) {
            warn!("--logic-for only takes effect with --mode advanced");
        }
        for (facet, logic) in &self.logic_for {
            patch = patch.facet_logic(*facet, *logic);
        }

        if let Some(minutes) = self.duration_max.or(self.duration_preset) {
            patch = patch.duration_max(Some(minutes));
        } else if let Some(reading) = self.duration_slider {
            patch = patch.duration_from_slider(reading, slider_max);
        }
        patch
    }

    pub fn to_state(&self, slider_max: u32) -> FilterState {
        FilterState::default().apply_patch(&self.to_patch(slider_max))
    }
}

fn parse_logic_override(raw: &str) -> Result<(FacetId, Logic), String> {
    let (facet, logic) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FACET=LOGIC, got `{raw}`"))?;
    Ok((facet.parse()?, logic.parse()?))
}

fn parse_duration_preset(raw: &str) -> Result<u32, String> {
    let minutes: u32 = raw.parse().map_err(|err| format!("{err}"))?;
    if DURATION_PRESETS.contains(&minutes) {
        Ok(minutes)
    } else {
        Err(format!("expected one of {DURATION_PRESETS:?}, got {minutes}"))
    }
}

/// Where `cards` reads the catalog from.
#[derive(Debug, Default, Args)]
pub struct SourceArgs {
    /// JSON file holding a card list or a paginated envelope. Searched offline.
    #[arg(long = "catalog-file", value_name = "PATH", conflicts_with = "base_url")]
    pub catalog_file: Option<PathBuf>,

    /// Catalog API root; overrides `[catalog].base_url`.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout; overrides `[catalog].timeout_secs`.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl SourceArgs {
    fn client_config(&self, base: &ClientConfig) -> ClientConfig {
        let mut config = base.clone();
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config
    }

    fn search(&self, config: &CliConfig) -> Result<Arc<dyn CatalogSearch>> {
        if let Some(path) = &self.catalog_file {
            return Ok(Arc::new(load_catalog_file(path)?));
        }
        let client = HttpCatalogClient::new(&self.client_config(&config.catalog))
            .context("invalid catalog client configuration")?;
        debug!(base_url = %client.base_url(), "using remote catalog");
        Ok(Arc::new(client))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
pub struct CardsCommand {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ParamsFormat {
    /// URL-encoded query string.
    #[default]
    Query,
    Json,
}

#[derive(Debug, Parser)]
pub struct ParamsCommand {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long = "format", value_enum, default_value_t = ParamsFormat::Query)]
    pub format: ParamsFormat,
}

#[derive(Debug, Parser)]
pub struct CardCommand {
    #[arg(value_name = "ID")]
    pub id: CardId,

    /// Catalog API root; overrides `[catalog].base_url`.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run_cards(cmd: CardsCommand, config: CliConfig) -> Result<()> {
    let state = cmd.filter.to_state(config.filter.duration_slider_max);
    let search = cmd.source.search(&config)?;
    let engine = FilterEngine::with_state(config.filter, state)?;

    // The whole selection is already in the initial state.
    let (patches, patch_rx) = mpsc::channel(1);
    drop(patches);
    let renderer = |view: &CatalogView| debug!(summary = %view.summary(), "view updated");
    let engine = run_engine(engine, search, patch_rx, renderer).await;

    let view = engine.view();
    if let Some(err) = &view.failure {
        bail!("catalog search failed: {err}");
    }
    match cmd.format {
        OutputFormat::Text => print!("{}", render_text(view)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }
    Ok(())
}

pub fn run_params(cmd: ParamsCommand, config: CliConfig) -> Result<()> {
    let state = cmd.filter.to_state(config.filter.duration_slider_max);
    let params = compile_query(&state);
    match cmd.format {
        ParamsFormat::Query => println!("{params}"),
        ParamsFormat::Json => println!("{}", serde_json::to_string_pretty(&params)?),
    }
    Ok(())
}

pub async fn run_card(cmd: CardCommand, config: CliConfig) -> Result<()> {
    let source = SourceArgs {
        catalog_file: None,
        base_url: cmd.base_url,
        timeout_secs: cmd.timeout_secs,
    };
    let client = HttpCatalogClient::new(&source.client_config(&config.catalog))
        .context("invalid catalog client configuration")?;
    let card = client
        .get_card(cmd.id)
        .await
        .with_context(|| format!("failed to fetch card {}", cmd.id))?;
    match cmd.format {
        OutputFormat::Text => {
            println!("{}", card_line(&card));
            println!("  bloom: {}", card.bloom_level.as_str());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
    }
    Ok(())
}

fn load_catalog_file(path: &Path) -> Result<MemoryCatalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    let response: CardsResponse = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
    Ok(MemoryCatalog::new(response.into_cards()))
}

fn render_text(view: &CatalogView) -> String {
    let mut out = format!("{}\n", view.summary());
    for card in &view.cards {
        out.push_str("  ");
        out.push_str(&card_line(card));
        out.push('\n');
    }
    out
}

fn card_line(card: &Card) -> String {
    let kind = if card.is_technique() {
        card.activity_type.as_str()
    } else {
        card.card_kind.as_str()
    };
    format!(
        "#{:<4} {} ({} min, {kind})",
        card.id, card.title, card.duration_min
    )
}
