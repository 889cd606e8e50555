//! All three stages in one process.

use crate::collect::collect;
use crate::config::PipelineConfig;
use crate::error::NirfError;
use crate::extract::extract;
use crate::output::RunOutput;
use crate::publish::publish;
use tracing::info;

/// Collect, extract, then publish.
///
/// Stages share nothing but the files on disk, exactly as when they run as
/// separate commands. The first fatal error stops the run.
pub async fn run(config: &PipelineConfig) -> Result<RunOutput, NirfError> {
    info!("── collect ──");
    let collect = collect(config).await?;
    info!("── extract ──");
    let extract = extract(config).await?;
    info!("── publish ──");
    let publish = publish(config).await?;

    Ok(RunOutput {
        collect,
        extract,
        publish,
    })
}
