//! Analyze one recorded call and print the scored lead.
//!
//! Provider endpoints and keys come from `LEADLENS_*` environment variables;
//! usage: `score_call <lead-name> <audio-file>`

use anyhow::{Context, Result};

use leadlens_core::LeadData;
use leadlens_pipeline::{AnalysisPipeline, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let lead_name = args.next().context("usage: score_call <lead-name> <audio-file>")?;
    let audio_path = args.next().context("usage: score_call <lead-name> <audio-file>")?;

    let audio = std::fs::read(&audio_path)
        .with_context(|| format!("failed to read {audio_path}"))?;
    let extension = std::path::Path::new(&audio_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav")
        .to_string();

    let config = PipelineConfig::from_env()?;
    let pipeline = AnalysisPipeline::from_config(&config)?;

    pipeline.put_lead(&LeadData::new("demo", &lead_name)).await?;
    let lead = pipeline.ingest_recording("demo", &audio, &extension).await?;
    let relevance = pipeline.refresh_search("demo").await?;

    println!("search overview: {}", relevance.overview);
    let scored = pipeline.lead("demo").await?.expect("lead was just stored");
    println!("{}", serde_json::to_string_pretty(&scored)?);

    Ok(())
}
