//! Run persistence — the external sink for structured run records.
//!
//! Layout under the output root:
//! ```text
//! run_<id>/
//!   style_analysis_<timestamp>.json
//!   round_01/results.json
//!   ...
//!   complete_results.json
//!   summary_report.md
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::analysis::CorpusAnalysis;
use crate::errors::PipelineError;
use crate::models::run::{IterationRecord, RunSummary};

pub struct RunWriter {
    root: PathBuf,
}

impl RunWriter {
    pub fn create(root: &Path) -> Result<Self, PipelineError> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn run_dir(&self, run_id: &str) -> Result<PathBuf, PipelineError> {
        let dir = self.root.join(format!("run_{run_id}"));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Persists the style profile and per-document breakdown as a
    /// timestamped artifact.
    pub fn write_style_analysis(
        &self,
        run_id: &str,
        analysis: &CorpusAnalysis,
    ) -> Result<PathBuf, PipelineError> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let path = self
            .run_dir(run_id)?
            .join(format!("style_analysis_{timestamp}.json"));

        let breakdown: Vec<serde_json::Value> = analysis
            .documents
            .iter()
            .map(|d| {
                json!({
                    "title": d.title,
                    "url": d.url,
                    "date": d.date,
                    "word_count": d.word_count,
                    "paragraph_count": d.paragraph_count,
                    "data_points": d.data_points,
                    "topic_tags": d.topic_tags,
                    "hook_type": d.hook_type,
                    "conclusion_type": d.conclusion_type,
                })
            })
            .collect();

        let payload = json!({
            "timestamp": timestamp,
            "documents_analyzed": analysis.documents.len(),
            "documents_skipped": analysis.skipped,
            "style_profile": analysis.profile,
            "documents": breakdown,
        });

        fs::write(&path, serde_json::to_vec_pretty(&payload)?)?;
        debug!("Wrote style analysis to {}", path.display());
        Ok(path)
    }

    /// Persists one round's record under `round_NN/`.
    pub fn write_round(
        &self,
        run_id: &str,
        record: &IterationRecord,
    ) -> Result<PathBuf, PipelineError> {
        let dir = self
            .run_dir(run_id)?
            .join(format!("round_{:02}", record.round));
        fs::create_dir_all(&dir)?;
        let path = dir.join("results.json");
        fs::write(&path, serde_json::to_vec_pretty(record)?)?;
        debug!("Wrote round {} record to {}", record.round, path.display());
        Ok(path)
    }

    /// Persists the complete run record and a readable Markdown report.
    pub fn write_summary(
        &self,
        run_id: &str,
        summary: &RunSummary,
        records: &[IterationRecord],
    ) -> Result<(), PipelineError> {
        let dir = self.run_dir(run_id)?;

        let complete = json!({
            "summary": summary,
            "rounds": records,
        });
        fs::write(
            dir.join("complete_results.json"),
            serde_json::to_vec_pretty(&complete)?,
        )?;

        fs::write(dir.join("summary_report.md"), render_report(summary))?;
        debug!("Wrote run summary to {}", dir.display());
        Ok(())
    }
}

fn render_report(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("# Iterative Improvement Report\n\n");
    out.push_str(&format!("**Run ID:** {}\n\n", summary.run_id));
    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Rounds Completed:** {}\n", summary.rounds_completed));
    out.push_str(&format!("- **Initial Score:** {:.1}%\n", summary.first_score * 100.0));
    out.push_str(&format!("- **Final Score:** {:.1}%\n", summary.final_score * 100.0));
    out.push_str(&format!(
        "- **Total Improvement:** {:+.1}%\n",
        summary.total_improvement * 100.0
    ));
    out.push_str(&format!(
        "- **Best Score:** {:.1}% (round {})\n",
        summary.best_score * 100.0,
        summary.best_round
    ));
    out.push_str(&format!(
        "- **Convergence:** {}\n",
        if summary.convergence_achieved {
            "achieved"
        } else {
            "not reached"
        }
    ));

    out.push_str("\n## Score Trajectory\n\n| Round | Best Score | Improvement |\n|---|---|---|\n");
    for (i, score) in summary.score_trajectory.iter().enumerate() {
        let improvement = if i > 0 {
            format!("{:+.1}%", (score - summary.score_trajectory[i - 1]) * 100.0)
        } else {
            String::new()
        };
        out.push_str(&format!("| {} | {:.1}% | {improvement} |\n", i + 1, score * 100.0));
    }

    if !summary.most_common_improvement_areas.is_empty() {
        out.push_str("\n## Most Common Improvement Areas\n\n");
        for area in &summary.most_common_improvement_areas {
            out.push_str(&format!("- {}\n", area.replace('_', " ")));
        }
    }

    out.push_str("\n## Final Optimized Prompt\n\n```\n");
    let prompt_excerpt: String = summary.final_prompt.chars().take(500).collect();
    out.push_str(&prompt_excerpt);
    if summary.final_prompt.chars().count() > 500 {
        out.push_str("...");
    }
    out.push_str("\n```\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::run::TerminalState;

    fn record(round: u32) -> IterationRecord {
        IterationRecord {
            round,
            timestamp: Utc::now(),
            candidates: vec![],
            results: vec![],
            round_best_score: 0.5,
            best_overall_score: 0.5,
            selected_directives: vec!["improve_structural_flow".to_string()],
        }
    }

    fn summary() -> RunSummary {
        RunSummary {
            run_id: "test-run".to_string(),
            rounds_completed: 2,
            first_score: 0.5,
            final_score: 0.6,
            best_score: 0.6,
            best_round: 2,
            total_improvement: 0.1,
            avg_improvement_per_round: 0.1,
            most_common_improvement_areas: vec!["data_integration".to_string()],
            score_trajectory: vec![0.5, 0.6],
            terminal_state: TerminalState::MaxRounds,
            convergence_achieved: false,
            final_prompt: "the optimized prompt".to_string(),
        }
    }

    #[test]
    fn test_round_records_written_under_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RunWriter::create(dir.path()).unwrap();
        let path = writer.write_round("abc", &record(3)).unwrap();
        assert!(path.ends_with("run_abc/round_03/results.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_summary_writes_json_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RunWriter::create(dir.path()).unwrap();
        writer
            .write_summary("abc", &summary(), &[record(1), record(2)])
            .unwrap();
        let run_dir = dir.path().join("run_abc");
        assert!(run_dir.join("complete_results.json").exists());
        let report = std::fs::read_to_string(run_dir.join("summary_report.md")).unwrap();
        assert!(report.contains("Total Improvement"));
        assert!(report.contains("data integration"));
    }

    #[test]
    fn test_report_marks_unconverged_runs() {
        let report = render_report(&summary());
        assert!(report.contains("not reached"));
    }
}
