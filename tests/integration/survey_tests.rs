//! End-to-end survey runs against scripted collaborators

use crate::fakes::{test_config, Gauge, Script, ScriptedProber, ScriptedResolver};
use route_survey::model::UnitStatus;
use route_survey::output::RunSummary;
use route_survey::Coordinator;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Runs a survey over `domains` and returns the summary plus the gauge
async fn run_scripted(
    domains: &[(&str, Script)],
    concurrency: usize,
    timeout_secs: u64,
    dir: &Path,
    delay: Duration,
) -> (RunSummary, Arc<Gauge>) {
    let gauge = Arc::new(Gauge::default());
    let resolver = ScriptedResolver::new(domains, delay, gauge.clone());
    let prober = ScriptedProber::new(resolver.slow_addresses(), delay, gauge.clone());
    let names: Vec<&str> = domains.iter().map(|(d, _)| *d).collect();
    let config = test_config(&names, concurrency, timeout_secs, dir);

    let summary = Coordinator::new(config, resolver, prober)
        .with_console(false)
        .run()
        .await
        .expect("survey run failed");

    (summary, gauge)
}

fn read_rows(summary: &RunSummary) -> Vec<String> {
    let content = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(content.ends_with("\r\n"), "report must end on a row boundary");
    content.split_terminator("\r\n").map(String::from).collect()
}

fn artifacts_for(dir: &Path, domain: &str) -> Vec<String> {
    let prefix = format!("traceroute_{}_", domain.replace('.', "_"));
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".txt"))
        .collect()
}

#[tokio::test]
async fn test_ok_and_unresolvable_domain() {
    let dir = TempDir::new().unwrap();
    let domains = [("ok.test", Script::Ok), ("bad.test", Script::NotFound)];

    let (summary, _) = run_scripted(&domains, 2, 5, dir.path(), Duration::from_millis(5)).await;
    let rows = read_rows(&summary);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], "Domain,IP Address,Traceroute File,Timestamp");

    let ok_row: Vec<&str> = rows.iter().find(|r| r.starts_with("ok.test,")).unwrap().split(',').collect();
    assert_eq!(ok_row.len(), 4);
    assert_ne!(ok_row[1], "N/A");
    assert_ne!(ok_row[2], "N/A");
    assert!(Path::new(ok_row[2]).exists());

    let bad_row: Vec<&str> = rows.iter().find(|r| r.starts_with("bad.test,")).unwrap().split(',').collect();
    assert_eq!(&bad_row[..3], &["bad.test", "N/A", "N/A"]);
    assert_eq!(bad_row[3].len(), "2024-01-01 00:00:00".len());

    assert_eq!(artifacts_for(dir.path(), "ok.test").len(), 1);
    assert!(artifacts_for(dir.path(), "bad.test").is_empty());
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_artifact_header_and_name_pattern() {
    let dir = TempDir::new().unwrap();
    let domains = [("www.ok.test", Script::Ok)];

    let (summary, _) = run_scripted(&domains, 1, 5, dir.path(), Duration::ZERO).await;
    let names = artifacts_for(dir.path(), "www.ok.test");
    assert_eq!(names.len(), 1);

    // traceroute_www_ok_test_YYYYMMDD_HHMMSS.txt
    let stamp = names[0]
        .trim_start_matches("traceroute_www_ok_test_")
        .trim_end_matches(".txt");
    assert_eq!(stamp.len(), 15);
    assert_eq!(&stamp[8..9], "_");
    assert!(stamp.replace('_', "").chars().all(|c| c.is_ascii_digit()));

    let content = std::fs::read_to_string(dir.path().join(&names[0])).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "=== Traceroute for www.ok.test (192.0.2.1) ===");
    assert!(lines[1].starts_with("Date: "));
    assert_eq!(lines[2], "===================================");
    assert_eq!(lines[3], " 1  192.0.2.1  0.123 ms");
    assert_eq!(summary.count(UnitStatus::Traced), 1);
}

#[tokio::test]
async fn test_slow_probe_times_out_without_hanging() {
    let dir = TempDir::new().unwrap();
    let domains = [("slow.test", Script::Slow), ("ok.test", Script::Ok)];
    let start = Instant::now();

    let (summary, _) = run_scripted(&domains, 2, 1, dir.path(), Duration::from_millis(5)).await;

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(summary.count(UnitStatus::TimedOut), 1);
    assert_eq!(summary.count(UnitStatus::Traced), 1);

    let rows = read_rows(&summary);
    let slow_row: Vec<&str> = rows.iter().find(|r| r.starts_with("slow.test,")).unwrap().split(',').collect();
    assert_ne!(slow_row[2], "N/A");

    let content = std::fs::read_to_string(slow_row[2]).unwrap();
    assert!(content.ends_with("Traceroute timed out"));
}

#[tokio::test]
async fn test_concurrency_bound_is_respected() {
    let dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..20).map(|i| format!("host{}.test", i)).collect();
    let domains: Vec<(&str, Script)> = names.iter().map(|n| (n.as_str(), Script::Ok)).collect();

    let (summary, gauge) = run_scripted(&domains, 3, 5, dir.path(), Duration::from_millis(20)).await;

    assert!(gauge.peak() <= 3, "peak in-flight {} exceeded limit", gauge.peak());
    assert!(gauge.peak() >= 1);
    assert_eq!(gauge.current(), 0);
    assert_eq!(summary.count(UnitStatus::Traced), 20);
}

#[tokio::test]
async fn test_report_has_one_row_per_domain() {
    for size in [1usize, 7, 25] {
        let dir = TempDir::new().unwrap();
        let names: Vec<String> = (0..size).map(|i| format!("n{}.test", i)).collect();
        let domains: Vec<(&str, Script)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let script = if i % 3 == 0 { Script::NotFound } else { Script::Ok };
                (n.as_str(), script)
            })
            .collect();

        let (summary, _) = run_scripted(&domains, 4, 5, dir.path(), Duration::from_millis(1)).await;
        let rows = read_rows(&summary);

        assert_eq!(rows.len(), size + 1, "size {}", size);
        assert_eq!(summary.rows_written, size);
        let seen: HashSet<&str> = rows[1..].iter().map(|r| r.split(',').next().unwrap()).collect();
        assert_eq!(seen.len(), size);
    }
}

#[tokio::test]
async fn test_parallel_rows_match_sequential_rows() {
    let names: Vec<String> = (0..16).map(|i| format!("cmp{}.test", i)).collect();
    let domains: Vec<(&str, Script)> = names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let script = if i % 4 == 0 { Script::NotFound } else { Script::Ok };
            (n.as_str(), script)
        })
        .collect();

    // Drop the run-specific columns (artifact file name and timestamp).
    let normalize = |rows: Vec<String>| -> Vec<String> {
        let mut out: Vec<String> = rows[1..]
            .iter()
            .map(|r| {
                let fields: Vec<&str> = r.split(',').collect();
                assert_eq!(fields.len(), 4, "malformed row: {:?}", r);
                let artifact = if fields[2] == "N/A" { "N/A" } else { "file" };
                format!("{},{},{}", fields[0], fields[1], artifact)
            })
            .collect();
        out.sort();
        out
    };

    let seq_dir = TempDir::new().unwrap();
    let (seq, _) = run_scripted(&domains, 1, 5, seq_dir.path(), Duration::from_millis(2)).await;
    let par_dir = TempDir::new().unwrap();
    let (par, _) = run_scripted(&domains, 8, 5, par_dir.path(), Duration::from_millis(2)).await;

    let seq_rows = read_rows(&seq);
    let par_rows = read_rows(&par);
    assert_eq!(seq_rows[0], par_rows[0]);
    assert_eq!(normalize(seq_rows), normalize(par_rows));
}

#[tokio::test]
async fn test_resolver_failure_is_recorded_not_fatal() {
    let dir = TempDir::new().unwrap();
    let domains = [("down.test", Script::ResolverDown), ("ok.test", Script::Ok)];

    let (summary, _) = run_scripted(&domains, 2, 5, dir.path(), Duration::ZERO).await;
    let rows = read_rows(&summary);

    assert_eq!(rows.len(), 3);
    let down = rows.iter().find(|r| r.starts_with("down.test,")).unwrap();
    assert!(down.starts_with("down.test,Error,"));
    assert!(down.contains("resolver unavailable"));
    assert_eq!(summary.count(UnitStatus::Errored), 1);
    assert!(artifacts_for(dir.path(), "down.test").is_empty());
}

#[tokio::test]
async fn test_missing_output_parent_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("reports").join("today");
    let domains = [("ok.test", Script::Ok)];

    let (summary, _) = run_scripted(&domains, 1, 5, &nested, Duration::ZERO).await;

    assert!(summary.report_path.starts_with(&nested));
    assert_eq!(artifacts_for(&nested, "ok.test").len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_prober_timeout_end_to_end() {
    use route_survey::probe::CommandProber;

    let dir = TempDir::new().unwrap();
    let gauge = Arc::new(Gauge::default());
    let resolver = ScriptedResolver::new(&[("slow.test", Script::Ok)], Duration::ZERO, gauge);
    let prober = CommandProber::new("sh", vec!["-c".to_string(), "sleep 30".to_string()]);
    let config = test_config(&["slow.test"], 1, 1, dir.path());
    let start = Instant::now();

    let summary = Coordinator::new(config, resolver, prober)
        .with_console(false)
        .run()
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(summary.count(UnitStatus::TimedOut), 1);
}
