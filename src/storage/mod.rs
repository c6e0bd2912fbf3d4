//! Results persistence module

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use serde_json::{json, to_string_pretty};
use crate::analysis::AnalysisResult;
use crate::error::Result;

/// Save analysis results to the specified directory
pub fn save_results<P: AsRef<Path>>(result: &AnalysisResult, output_dir: P) -> Result<()> {
    let output_dir = output_dir.as_ref();
    log::info!("Saving analysis results to {}", output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(result, output_dir)?;
    save_full_result(result, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save the headline numbers without the per-node score maps
fn save_summary(result: &AnalysisResult, output_dir: &Path) -> Result<()> {
    log::info!("Saving summary information");

    let path = output_dir.join("summary.json");
    let mut file = File::create(path)?;

    let summary = json!({
        "graph_stats": {
            "input_node_count": result.input_node_count,
            "input_edge_count": result.input_edge_count,
            "component_count": result.component_count,
            "node_count": result.node_count,
            "edge_count": result.edge_count,
            "density": result.density,
        },
        "top_influencers": result.top_influencers,
        "top_bridges": result.top_bridges,
        "community_stats": {
            "modularity": result.modularity,
            "sizes": result.community_stats,
            "top_sizes": result
                .communities
                .as_ref()
                .map(|p| p.sizes().into_iter().take(10).collect::<Vec<_>>()),
        },
        "recovered_errors": result.recovered_errors,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save the complete result, score maps and partition included
fn save_full_result(result: &AnalysisResult, output_dir: &Path) -> Result<()> {
    log::info!("Saving full analysis result");

    let path = output_dir.join("analysis.json");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, result)?;
    writer.flush()?;

    Ok(())
}
