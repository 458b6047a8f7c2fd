use crate::core::error::FetchError;
use crate::core::models::FetchReport;
use crate::core::settings::Settings;
use crate::sources;
use anyhow::Result;
use chrono::Local;

pub async fn run(settings: &Settings, json: bool) -> Result<()> {
    let source = sources::from_settings(&settings.source);
    let name = source.name();

    let result = tokio::task::spawn_blocking(move || source.fetch()).await?;
    let report = build_report(name, &result);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => anyhow::bail!("{} source: {}", name, e),
    }
}

fn build_report(source: &str, result: &Result<String, FetchError>) -> FetchReport {
    FetchReport {
        source: source.to_string(),
        text: result.as_ref().ok().cloned(),
        error: result.as_ref().err().map(|e| e.to_string()),
        fetched_at: Local::now(),
    }
}
