// file: src/pipeline/orchestrator.rs
// description: two-pass migration run: build mappings, rewrite, then commit all outputs
// reference: pipeline orchestration

use crate::config::Config;
use crate::error::{MigrationError, Result};
use crate::exporter::json::{JsonReporter, MigrationReport};
use crate::exporter::staging::{StagedFile, commit_all};
use crate::exporter::table::DelimitedTable;
use crate::mapping::MappingBuilder;
use crate::models::MappingSet;
use crate::pipeline::audit::{LinkAuditor, UnresolvedLink};
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::rewriter::{RewriteStats, Rewriter};
use crate::utils::{OperationTimer, Validator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct PlanOutcome {
    pub mappings: MappingSet,
    pub written: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct MigrationOutcome {
    pub mappings: MappingSet,
    pub rewrite: RewriteStats,
    pub unresolved: Vec<UnresolvedLink>,
    pub written: Vec<PathBuf>,
}

pub struct MigrationPipeline {
    config: Config,
    show_progress: bool,
    colored: bool,
}

impl MigrationPipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            show_progress: false,
            colored: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First pass only: builds the mappings and writes both tables.
    pub fn plan(&self, input: &Path) -> Result<PlanOutcome> {
        self.config.validate()?;
        Validator::validate_input_file(input)?;
        self.validate_table_paths(&[input])?;

        let content = read_input(input)?;
        let mappings = self.build_mappings(&content);

        let mut staged = self.stage_tables(&mappings)?;
        if let Some(report_path) = &self.config.output.report_file {
            let report = MigrationReport::new(
                &input.display().to_string(),
                &content,
                &self.config.migration.old_domain,
                &self.config.migration.new_domain,
                &mappings,
            );
            staged.push(stage_report(report_path, &report)?);
        }

        let written = commit_all(staged)?;
        Ok(PlanOutcome { mappings, written })
    }

    /// Full run. Nothing is written unless both passes succeed.
    pub fn run(&self, input: &Path, output: &Path) -> Result<MigrationOutcome> {
        self.config.validate()?;
        Validator::validate_input_file(input)?;
        Validator::validate_output_path(output)?;
        Validator::validate_distinct_paths(&[input, output])?;
        self.validate_table_paths(&[input, output])?;

        let content = read_input(input)?;
        let mappings = self.build_mappings(&content);

        let timer = OperationTimer::new("rewrite export");
        let rewriter = Rewriter::new(&self.config, &mappings)?;
        let total_lines = content.lines().count();
        let progress = if self.show_progress {
            ProgressTracker::with_color(total_lines, self.colored)
        } else {
            ProgressTracker::hidden(total_lines)
        };

        let mut buffer = Vec::with_capacity(content.len());
        let rewrite = rewriter.rewrite_document(&content, &mut buffer, Some(&progress))?;
        progress.finish();
        timer.finish_with_count(rewrite.replacements, "url replacements");

        let auditor = LinkAuditor::new(&self.config)?;
        let rewritten = String::from_utf8(buffer)
            .map_err(|e| MigrationError::Validation(format!("rewritten output is not UTF-8: {}", e)))?;
        let unresolved = auditor.audit(&rewritten);
        for link in &unresolved {
            warn!("Unmapped old url at line {}: {}", link.line, link.url);
        }

        let mut staged = vec![StagedFile::stage(output, rewritten.as_bytes())?];
        staged.extend(self.stage_tables(&mappings)?);
        if let Some(report_path) = &self.config.output.report_file {
            let report = MigrationReport::new(
                &input.display().to_string(),
                &content,
                &self.config.migration.old_domain,
                &self.config.migration.new_domain,
                &mappings,
            )
            .with_rewrite(rewrite.clone(), unresolved.clone());
            staged.push(stage_report(report_path, &report)?);
        }

        let written = commit_all(staged)?;
        info!(
            "Rewrote {} of {} lines into {}",
            rewrite.rewritten_lines,
            rewrite.lines,
            output.display()
        );

        Ok(MigrationOutcome {
            mappings,
            rewrite,
            unresolved,
            written,
        })
    }

    /// Lists old-scheme post urls still present outside protected lines.
    pub fn check(&self, path: &Path) -> Result<Vec<UnresolvedLink>> {
        Validator::validate_input_file(path)?;
        let content = read_input(path)?;
        let auditor = LinkAuditor::new(&self.config)?;
        Ok(auditor.audit(&content))
    }

    fn build_mappings(&self, content: &str) -> MappingSet {
        let timer = OperationTimer::new("build basename mappings");
        let mappings = MappingBuilder::build(&self.config, content);
        timer.finish_with_count(mappings.basenames.len(), "posts mapped");

        if !mappings.skipped.is_empty() {
            warn!("{} post(s) skipped, see warnings above", mappings.skipped.len());
        }
        if mappings.root_mismatches > 0 {
            warn!(
                "{} post url(s) are not under http(s)://{}/, their links will not be rewritten; check old_path_prefix",
                mappings.root_mismatches,
                self.config.migration.old_url_root()
            );
        }
        mappings
    }

    fn stage_tables(&self, mappings: &MappingSet) -> Result<Vec<StagedFile>> {
        let output = &self.config.output;
        Ok(vec![
            StagedFile::stage(
                &output.basename_mappings_file,
                DelimitedTable::basenames(&mappings.basenames)
                    .render()
                    .as_bytes(),
            )?,
            StagedFile::stage(
                &output.url_replacements_file,
                DelimitedTable::url_replacements(&mappings.urls)
                    .render()
                    .as_bytes(),
            )?,
        ])
    }

    fn validate_table_paths(&self, others: &[&Path]) -> Result<()> {
        let output = &self.config.output;
        let mut paths: Vec<&Path> = others.to_vec();
        paths.push(&output.basename_mappings_file);
        paths.push(&output.url_replacements_file);
        if let Some(report) = &output.report_file {
            paths.push(report);
        }

        for path in &paths[others.len()..] {
            Validator::validate_output_path(path)?;
        }
        Validator::validate_distinct_paths(&paths)
    }
}

fn read_input(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| MigrationError::file(path, e))?;
    info!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

fn stage_report(path: &Path, report: &MigrationReport) -> Result<StagedFile> {
    let json = JsonReporter::new(true).render(report)?;
    StagedFile::stage(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const EXPORT: &str = "\
AUTHOR: gumption
TITLE: A Day In The Life, Revisited!
BASENAME: a_day_in_the_l
STATUS: Publish
UNIQUE URL: http://gumption.typepad.com/2009/04/a_day_in_the_l.html
DATE: 04/12/2009 10:15:00 AM
-----
BODY:
<p>First post.</p>
-----
--------
TITLE: Update
BASENAME: update
UNIQUE URL: http://gumption.typepad.com/2009/04/update.html
DATE: 04/20/2009 10:15:00 AM
-----
BODY:
<p>Following up on <a href=\"http://gumption.typepad.com/2009/04/a_day_in_the_l.html\">this</a>.</p>
-----
--------
TITLE: Update
BASENAME: update_1
UNIQUE URL: http://gumption.typepad.com/2009/04/update_1.html
DATE: 04/28/2009 10:15:00 AM
-----
BODY:
<p>See <a href=\"http://gumption.typepad.com/2009/04/update.html\">the first update</a>
and <a href=\"http://gumption.typepad.com/2008/01/never_exported.html\">an old one</a>.</p>
-----
--------
";

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default_config();
        config.output.basename_mappings_file = dir.join("basename_mappings.txt");
        config.output.url_replacements_file = dir.join("url_replacements.txt");
        config
    }

    #[test]
    fn test_run_writes_output_and_tables() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        let output = temp.path().join("export.wordpress.txt");
        fs::write(&input, EXPORT).unwrap();

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        let outcome = pipeline.run(&input, &output).unwrap();

        assert_eq!(outcome.written.len(), 3);
        assert_eq!(outcome.rewrite.replacements, 2);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].old_basename, "never_exported");

        let rewritten = fs::read_to_string(&output).unwrap();
        assert!(rewritten.contains(
            "<a href=\"https://interrelativity.com/2009/04/a-day-in-the-life-revisited\">this</a>"
        ));
        assert!(rewritten.contains("<a href=\"https://interrelativity.com/2009/04/update\">the first update</a>"));
        assert!(rewritten.contains("BASENAME: update-2\n"));
        assert!(rewritten.contains("UNIQUE URL: http://gumption.typepad.com/2009/04/update_1.html\n"));

        assert_eq!(
            fs::read_to_string(temp.path().join("basename_mappings.txt")).unwrap(),
            "a_day_in_the_l,a-day-in-the-life-revisited\nupdate,update\nupdate_1,update-2\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("url_replacements.txt")).unwrap(),
            "http://gumption.typepad.com/2009/04/a_day_in_the_l.html,https://interrelativity.com/2009/04/a-day-in-the-life-revisited\n\
             http://gumption.typepad.com/2009/04/update.html,https://interrelativity.com/2009/04/update\n\
             http://gumption.typepad.com/2009/04/update_1.html,https://interrelativity.com/2009/04/update-2\n"
        );
    }

    #[test]
    fn test_run_with_report() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        let output = temp.path().join("out.txt");
        fs::write(&input, EXPORT).unwrap();

        let mut config = config_in(temp.path());
        config.output.report_file = Some(temp.path().join("report.json"));
        let outcome = MigrationPipeline::new(config).run(&input, &output).unwrap();
        assert_eq!(outcome.written.len(), 4);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["stats"]["posts_mapped"], 3);
        assert_eq!(report["stats"]["unresolved_links"], 1);
        assert_eq!(report["mappings"][2]["new_basename"], "update-2");
    }

    #[test]
    fn test_run_reports_posts_outside_old_root() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        let output = temp.path().join("out.txt");
        fs::write(
            &input,
            "TITLE: Hello World\nBASENAME: hello_world\n\
             UNIQUE URL: http://gumption.typepad.com/blog/2009/04/hello_world.html\n-----\n\
             BODY:\n<a href=\"http://gumption.typepad.com/blog/2009/04/hello_world.html\">me</a>\n-----\n",
        )
        .unwrap();

        let mut config = config_in(temp.path());
        config.output.report_file = Some(temp.path().join("report.json"));
        let outcome = MigrationPipeline::new(config.clone()).run(&input, &output).unwrap();
        assert_eq!(outcome.mappings.root_mismatches, 1);
        assert_eq!(outcome.rewrite.replacements, 0);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["stats"]["root_mismatches"], 1);

        config.migration.old_path_prefix = "blog".to_string();
        let outcome = MigrationPipeline::new(config).run(&input, &output).unwrap();
        assert_eq!(outcome.mappings.root_mismatches, 0);
        assert_eq!(outcome.rewrite.replacements, 1);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .contains("<a href=\"https://interrelativity.com/2009/04/hello-world\">me</a>"));
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("missing.txt");
        let output = temp.path().join("out.txt");

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        let err = pipeline.run(&input, &output).unwrap_err();

        assert!(matches!(err, MigrationError::FileOperation { .. }));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_output_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        fs::write(&input, EXPORT).unwrap();
        let output = temp.path().join("no_such_dir/out.txt");

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        assert!(pipeline.run(&input, &output).is_err());

        assert!(!temp.path().join("basename_mappings.txt").exists());
        assert!(!temp.path().join("url_replacements.txt").exists());
    }

    #[test]
    fn test_output_must_differ_from_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        fs::write(&input, EXPORT).unwrap();

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        assert!(pipeline.run(&input, &input).is_err());
        assert_eq!(fs::read_to_string(&input).unwrap(), EXPORT);
    }

    #[test]
    fn test_plan_writes_tables_only() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        fs::write(&input, EXPORT).unwrap();

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        let first = pipeline.plan(&input).unwrap();
        let second = pipeline.plan(&input).unwrap();

        assert_eq!(first.mappings, second.mappings);
        assert_eq!(first.written.len(), 2);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_check_after_run() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.txt");
        let output = temp.path().join("out.txt");
        fs::write(&input, EXPORT).unwrap();

        let pipeline = MigrationPipeline::new(config_in(temp.path()));
        assert_eq!(pipeline.check(&input).unwrap().len(), 3);

        pipeline.run(&input, &output).unwrap();
        let remaining = pipeline.check(&output).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining[0].url,
            "http://gumption.typepad.com/2008/01/never_exported.html"
        );
    }
}
