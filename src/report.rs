//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the full `AnalysisResult` for programmatic consumption

use std::collections::BTreeMap;

use colored::*;

use crate::aggregate::AnalysisResult;
use crate::infra::ConfigAnalysis;
use crate::manifest::ManifestReport;
use crate::score::DetectedPattern;

// =============================================================================
// JSON Format
// =============================================================================

/// Write the result as pretty-printed JSON. The result type itself is
/// the output contract, so no separate report shape is needed.
pub fn write_json(result: &AnalysisResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the result in pretty (human-readable) format.
pub fn write_pretty(path: &str, result: &AnalysisResult) {
    // Header
    println!();
    print!("  ");
    print!("{}", "stackscope".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    println!();

    // Summary
    print!("  Files: {}", result.summary.total_files);
    if !result.summary.category_counts.is_empty() {
        let breakdown: Vec<String> = result
            .summary
            .category_counts
            .iter()
            .map(|(category, count)| format!("{} {}", category, count))
            .collect();
        print!("  {}", format!("({})", breakdown.join(", ")).dimmed());
    }
    println!();
    print!("  Confidence: ");
    write_colored_confidence(result.summary.confidence);
    println!();
    println!();

    // Detected patterns, strongest first
    write_pattern_section("Frameworks", &result.patterns.frameworks);
    write_pattern_section("Tools", &result.patterns.tools);
    write_pattern_section("Infrastructure", &result.patterns.infrastructure);

    if let Some(manifest) = &result.manifest {
        write_manifest(manifest);
    }

    if !result.configs.is_empty() {
        write_configs(&result.configs);
    }
}

fn write_colored_confidence(confidence: f64) {
    let formatted = format!("{:.2}", confidence);
    match confidence {
        c if c >= 0.9 => print!("{}", formatted.green().bold()),
        c if c >= 0.7 => print!("{}", formatted.green()),
        c if c >= 0.4 => print!("{}", formatted.yellow()),
        _ => print!("{}", formatted.red()),
    }
}

fn write_pattern_section(title: &str, patterns: &BTreeMap<String, DetectedPattern>) {
    if patterns.is_empty() {
        return;
    }
    println!("  {}", format!("{}:", title).bold());

    // Rank by confidence descending; map order already breaks ties by name
    let mut ranked: Vec<(&String, &DetectedPattern)> = patterns.iter().collect();
    ranked.sort_by(|a, b| {
        b.1.confidence
            .partial_cmp(&a.1.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (name, pattern) in ranked {
        print!("    {:<18}", name);
        write_colored_confidence(pattern.confidence);
        if !pattern.evidence.is_empty() {
            print!("  {}", format!("({})", pattern.evidence.join(", ")).dimmed());
        }
        println!();
    }
    println!();
}

fn write_manifest(report: &ManifestReport) {
    if !report.success {
        print!("  {}", "Manifest: ".bold());
        print!("{}", "failed".red());
        if let Some(error) = &report.error {
            print!("  {}", format!("({})", error).dimmed());
        }
        println!();
        println!();
        return;
    }
    let Some(analysis) = &report.analysis else {
        return;
    };

    print!("  {}", "Manifest:".bold());
    if let Some(name) = &analysis.name {
        print!(" {}", name);
    }
    if let Some(version) = &analysis.version {
        print!(" {}", format!("v{}", version).dimmed());
    }
    println!();

    let scripts = &analysis.scripts;
    let roles = [
        ("build", &scripts.build),
        ("start", &scripts.start),
        ("dev", &scripts.dev),
        ("test", &scripts.test),
        ("lint", &scripts.lint),
        ("deploy", &scripts.deploy),
    ];
    for (role, command) in roles {
        if let Some(command) = command {
            println!("    {:<8} {}", format!("{}:", role).dimmed(), command);
        }
    }
    if let Some(tool) = &scripts.build_tool {
        println!("    {:<8} {}", "tool:".dimmed(), tool);
    }

    let counts = &analysis.dependency_counts;
    println!(
        "    {:<8} {} production, {} development",
        "deps:".dimmed(),
        counts.production,
        counts.development
    );
    println!();
}

fn write_configs(configs: &[ConfigAnalysis]) {
    println!("  {} ({}):", "Configs".bold(), configs.len());
    for config in configs {
        print!("    {:<24}", config.file().blue());
        println!("{}", config_summary(config).dimmed());
    }
    println!();
}

fn config_summary(config: &ConfigAnalysis) -> String {
    match config {
        ConfigAnalysis::Compose(compose) => {
            let mut summary = format!(
                "compose: {} service{}, {} volume{}",
                compose.services.len(),
                plural(compose.services.len()),
                compose.volumes.len(),
                plural(compose.volumes.len())
            );
            if compose.has_database {
                summary.push_str(", database");
            }
            summary
        }
        ConfigAnalysis::ContainerBuild(build) => {
            let mut summary = match &build.base_image {
                Some(base) => format!("container build from {}", base),
                None => "container build".to_string(),
            };
            if !build.exposed_ports.is_empty() {
                summary.push_str(&format!(
                    ", {} port{}",
                    build.exposed_ports.len(),
                    plural(build.exposed_ports.len())
                ));
            }
            if build.multi_stage {
                summary.push_str(", multi-stage");
            }
            summary
        }
        ConfigAnalysis::Env(env) => {
            let mut summary = format!(
                "env: {} variable{}",
                env.variables.len(),
                plural(env.variables.len())
            );
            if env.has_database {
                summary.push_str(", database");
            }
            if env.has_auth {
                summary.push_str(", auth");
            }
            if env.has_aws {
                summary.push_str(", aws");
            }
            summary
        }
        ConfigAnalysis::Bundler(bundler) => {
            let mut summary = format!("{} config", bundler.bundler);
            if bundler.has_dev_server {
                summary.push_str(", dev server");
            }
            if !bundler.plugins.is_empty() {
                summary.push_str(&format!(
                    ", {} plugin{}",
                    bundler.plugins.len(),
                    plural(bundler.plugins.len())
                ));
            }
            summary
        }
        ConfigAnalysis::Generic(generic) => {
            let mut summary = String::from("generic");
            if generic.valid_structured_data {
                summary.push_str(", structured");
            }
            summary.push_str(&format!(
                ", {} line{}",
                generic.line_count,
                plural(generic.line_count)
            ));
            summary
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}
