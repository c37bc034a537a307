//! Directory-level drivers for the `convert` and `send` steps.
//!
//! Files are processed one at a time in name order. A failure is local to
//! its file: it is logged and counted, then the run moves on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::RoleMap;
use crate::error::{ChatctxError, Result};
use crate::format::{OutputFormat, WrittenTables, write_to_format};
use crate::parsers::TranscriptParser;

#[cfg(feature = "api")]
use std::{thread, time::Duration};

#[cfg(feature = "api")]
use chrono::Local;
#[cfg(feature = "api")]
use serde_json::Value;

#[cfg(feature = "api")]
use crate::client::{Completion, CompletionClient, CompletionRequest};
#[cfg(feature = "api")]
use crate::config::{CompletionConfig, SendConfig};
#[cfg(feature = "api")]
use crate::core::output::{ModelExchange, read_context_csv, write_combined_export};

/// Counts for one directory run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files matching the extension.
    pub discovered: usize,
    /// Files handled successfully.
    pub processed: usize,
    /// Files skipped because of an error.
    pub failed: usize,
}

impl BatchSummary {
    /// Returns `true` if the directory held no matching files.
    pub fn is_empty(&self) -> bool {
        self.discovered == 0
    }

    /// Returns `true` if files were found but none succeeded.
    pub fn all_failed(&self) -> bool {
        self.discovered > 0 && self.processed == 0
    }
}

/// Lists the files in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by path.
///
/// # Errors
///
/// [`ChatctxError::Io`] if `dir` doesn't exist or can't be read.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ChatctxError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("folder does not exist: {}", dir.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ============================================================================
// convert
// ============================================================================

/// Outcome of converting one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    /// Transcript that was read.
    pub source: PathBuf,
    /// Messages written.
    pub messages: usize,
    /// Tables written.
    pub tables: WrittenTables,
}

/// Parses one transcript and writes its messages and context tables
/// into `output_dir`.
pub fn convert_file(
    path: &Path,
    output_dir: &Path,
    parser: &TranscriptParser,
    roles: &RoleMap,
    format: OutputFormat,
) -> Result<ConvertedFile> {
    let transcript = parser.parse(path)?;
    let context = roles.to_context(&transcript.messages);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    fs::create_dir_all(output_dir)?;
    let tables = write_to_format(&transcript.messages, &context, output_dir, &stem, format)?;

    info!(
        file = %path.display(),
        messages = transcript.len(),
        output = %tables.messages.display(),
        "converted transcript"
    );

    Ok(ConvertedFile {
        source: path.to_path_buf(),
        messages: transcript.len(),
        tables,
    })
}

/// Converts every `.txt` transcript in `input_dir`.
///
/// `on_file` is called after each file with its outcome.
///
/// # Errors
///
/// Only when `input_dir` can't be listed; per-file errors are counted.
pub fn convert_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    parser: &TranscriptParser,
    roles: &RoleMap,
    format: OutputFormat,
    mut on_file: F,
) -> Result<BatchSummary>
where
    F: FnMut(&Path, &Result<ConvertedFile>),
{
    let files = discover_files(input_dir, "txt")?;
    let mut summary = BatchSummary {
        discovered: files.len(),
        ..BatchSummary::default()
    };

    for path in &files {
        let outcome = convert_file(path, output_dir, parser, roles, format);
        match &outcome {
            Ok(_) => summary.processed += 1,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping transcript");
                summary.failed += 1;
            }
        }
        on_file(path, &outcome);
    }

    Ok(summary)
}

// ============================================================================
// send
// ============================================================================

/// What happened to one model request.
#[cfg(feature = "api")]
#[derive(Debug)]
pub enum ReplyOutcome {
    /// Payload built, nothing sent.
    DryRun,
    /// The model answered.
    Completed(Completion),
    /// The call failed.
    Failed(ChatctxError),
}

/// One model's part of a [`SentFile`].
#[cfg(feature = "api")]
#[derive(Debug)]
pub struct ModelReply {
    /// Provider key (`claude`, `gpt`).
    pub provider: &'static str,
    /// Human-readable provider name.
    pub display_name: &'static str,
    /// Request body.
    pub payload: Value,
    /// Result of the request.
    pub outcome: ReplyOutcome,
}

#[cfg(feature = "api")]
impl ModelReply {
    /// Reply text, if the model answered.
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            ReplyOutcome::Completed(c) => Some(&c.text),
            _ => None,
        }
    }

    fn exchange(&self) -> Option<ModelExchange> {
        match &self.outcome {
            ReplyOutcome::DryRun => None,
            ReplyOutcome::Completed(c) => {
                Some(ModelExchange::completed(self.payload.clone(), c.raw.clone()))
            }
            ReplyOutcome::Failed(e) => {
                Some(ModelExchange::failed(self.payload.clone(), e.to_string()))
            }
        }
    }
}

/// Outcome of sending one context table to every model.
#[cfg(feature = "api")]
#[derive(Debug)]
pub struct SentFile {
    /// Context table that was read.
    pub source: PathBuf,
    /// Records sent.
    pub records: usize,
    /// One entry per client, in client order.
    pub replies: Vec<ModelReply>,
    /// Combined export, written when at least one model answered.
    pub export: Option<PathBuf>,
}

#[cfg(feature = "api")]
impl SentFile {
    /// Returns `true` if at least one model answered.
    pub fn any_completed(&self) -> bool {
        self.replies
            .iter()
            .any(|r| matches!(r.outcome, ReplyOutcome::Completed(_)))
    }

    /// Returns `true` if any request went over the network.
    pub fn made_remote_calls(&self) -> bool {
        self.replies.iter().any(|r| match &r.outcome {
            ReplyOutcome::DryRun => false,
            ReplyOutcome::Completed(_) => true,
            ReplyOutcome::Failed(e) => !e.is_missing_credential(),
        })
    }

    fn succeeded(&self) -> bool {
        self.any_completed()
            || self
                .replies
                .iter()
                .all(|r| matches!(r.outcome, ReplyOutcome::DryRun))
    }
}

/// Reads one context table and sends it to every client.
///
/// Model failures are recorded in the returned [`SentFile`]; only a
/// table that can't be read (or an export that can't be written) fails
/// the whole file.
#[cfg(feature = "api")]
pub fn send_file<C: CompletionClient>(
    path: &Path,
    clients: &[C],
    completion: &CompletionConfig,
    send: &SendConfig,
) -> Result<SentFile> {
    let records = read_context_csv(path)?;
    let count = records.len();
    let request = CompletionRequest::from_config(records, completion);

    let replies: Vec<ModelReply> = clients
        .iter()
        .map(|client| {
            let payload = client.payload(&request);
            let outcome = if send.dry_run {
                ReplyOutcome::DryRun
            } else {
                match client.complete(&request) {
                    Ok(completion) => ReplyOutcome::Completed(completion),
                    Err(e) => {
                        warn!(
                            file = %path.display(),
                            provider = client.provider(),
                            error = %e,
                            "model request failed"
                        );
                        ReplyOutcome::Failed(e)
                    }
                }
            };
            ModelReply {
                provider: client.provider(),
                display_name: client.display_name(),
                payload,
                outcome,
            }
        })
        .collect();

    let mut sent = SentFile {
        source: path.to_path_buf(),
        records: count,
        replies,
        export: None,
    };

    if sent.any_completed() {
        let exchanges: Vec<(&str, ModelExchange)> = sent
            .replies
            .iter()
            .filter_map(|r| r.exchange().map(|ex| (r.provider, ex)))
            .collect();
        let written = write_combined_export(
            &send.answers_dir,
            path,
            Local::now().naive_local(),
            &exchanges,
        )?;
        info!(file = %path.display(), export = %written.display(), "exported replies");
        sent.export = Some(written);
    }

    Ok(sent)
}

/// Sends every `.csv` context table in `dir` to every client.
///
/// Between files that made remote calls the driver sleeps
/// [`SendConfig::pause_secs`]; it never sleeps after the last file or in
/// dry-run mode.
#[cfg(feature = "api")]
pub fn send_directory<C, F>(
    dir: &Path,
    clients: &[C],
    completion: &CompletionConfig,
    send: &SendConfig,
    mut on_file: F,
) -> Result<BatchSummary>
where
    C: CompletionClient,
    F: FnMut(&Path, &Result<SentFile>),
{
    let files = discover_files(dir, "csv")?;
    let mut summary = BatchSummary {
        discovered: files.len(),
        ..BatchSummary::default()
    };

    for (i, path) in files.iter().enumerate() {
        let outcome = send_file(path, clients, completion, send);

        let remote = match &outcome {
            Ok(sent) => {
                if sent.succeeded() {
                    summary.processed += 1;
                } else {
                    summary.failed += 1;
                }
                sent.made_remote_calls()
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping context table");
                summary.failed += 1;
                false
            }
        };
        on_file(path, &outcome);

        let is_last = i + 1 == files.len();
        if remote && !is_last && send.pause_secs > 0 {
            info!(seconds = send.pause_secs, "waiting before the next file");
            thread::sleep(Duration::from_secs(send.pause_secs));
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TRANSCRIPT: &str = "24/07/2025 11:22 - Mavi – Mosaic: Olá!\n\
24/07/2025 11:23 - Ana: Oi, tudo bem?\n";

    #[test]
    fn test_discover_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.TXT"), "").unwrap();
        fs::write(dir.path().join("c.csv"), "").unwrap();
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let files = discover_files(dir.path(), "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
    }

    #[test]
    fn test_discover_files_missing_dir() {
        let err = discover_files(Path::new("/definitely/not/here"), "txt").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_convert_directory() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("lead.txt"), TRANSCRIPT).unwrap();
        fs::write(input.path().join("broken.txt"), "no headers here").unwrap();

        let mut seen = Vec::new();
        let summary = convert_directory(
            input.path(),
            output.path(),
            &TranscriptParser::new(),
            &RoleMap::default(),
            OutputFormat::Csv,
            |path, outcome| seen.push((path.to_path_buf(), outcome.is_ok())),
        )
        .unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                discovered: 2,
                processed: 1,
                failed: 1
            }
        );
        assert_eq!(seen.len(), 2);

        let context = fs::read_to_string(output.path().join("context_lead_parsed.csv")).unwrap();
        assert_eq!(
            context,
            "role,content\nassistant,Olá!\nuser,\"Oi, tudo bem?\"\n"
        );
        assert!(output.path().join("lead_parsed.csv").exists());
        assert!(!output.path().join("broken_parsed.csv").exists());
    }

    #[test]
    fn test_convert_empty_directory() {
        let input = tempdir().unwrap();
        let summary = convert_directory(
            input.path(),
            input.path(),
            &TranscriptParser::new(),
            &RoleMap::default(),
            OutputFormat::Csv,
            |_, _| {},
        )
        .unwrap();
        assert!(summary.is_empty());
        assert!(!summary.all_failed());
    }

    #[cfg(feature = "api")]
    mod send {
        use super::*;
        use serde_json::json;
        use std::cell::Cell;

        struct FakeClient {
            provider: &'static str,
            fail: bool,
            calls: Cell<usize>,
        }

        impl FakeClient {
            fn new(provider: &'static str, fail: bool) -> Self {
                Self {
                    provider,
                    fail,
                    calls: Cell::new(0),
                }
            }
        }

        impl CompletionClient for FakeClient {
            fn provider(&self) -> &'static str {
                self.provider
            }

            fn display_name(&self) -> &'static str {
                self.provider
            }

            fn model(&self) -> &str {
                "fake-model"
            }

            fn payload(&self, request: &CompletionRequest) -> Value {
                json!({"model": "fake-model", "messages": request.messages})
            }

            fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
                self.calls.set(self.calls.get() + 1);
                if self.fail {
                    return Err(ChatctxError::remote(self.provider, Some(500), "down"));
                }
                Ok(Completion {
                    text: "Oi Ana!".to_string(),
                    payload: self.payload(request),
                    raw: json!({"reply": "Oi Ana!"}),
                })
            }
        }

        fn write_table(dir: &Path, name: &str) {
            fs::write(dir.join(name), "role,content\nuser,Oi\n").unwrap();
        }

        fn config(answers: &Path) -> SendConfig {
            SendConfig::new().with_answers_dir(answers).with_pause_secs(0)
        }

        #[test]
        fn test_send_file_exports_partial_failure() {
            let dir = tempdir().unwrap();
            write_table(dir.path(), "lead one.csv");
            let answers = dir.path().join("answers");

            let clients = [FakeClient::new("claude", false), FakeClient::new("gpt", true)];
            let sent = send_file(
                &dir.path().join("lead one.csv"),
                &clients,
                &CompletionConfig::default(),
                &config(&answers),
            )
            .unwrap();

            assert_eq!(sent.records, 1);
            assert!(sent.any_completed());
            assert_eq!(sent.replies[0].text(), Some("Oi Ana!"));
            assert!(matches!(sent.replies[1].outcome, ReplyOutcome::Failed(_)));

            let export = sent.export.unwrap();
            let name = export.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("lead_one_ai_combined_"));

            let value: Value =
                serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
            assert_eq!(value["source_csv"], "lead one.csv");
            assert_eq!(value["claude"]["response"]["reply"], "Oi Ana!");
            assert!(value["gpt"]["error"].as_str().unwrap().contains("down"));
        }

        #[test]
        fn test_send_file_all_failed_writes_nothing() {
            let dir = tempdir().unwrap();
            write_table(dir.path(), "lead.csv");
            let answers = dir.path().join("answers");

            let clients = [FakeClient::new("claude", true)];
            let sent = send_file(
                &dir.path().join("lead.csv"),
                &clients,
                &CompletionConfig::default(),
                &config(&answers),
            )
            .unwrap();

            assert!(sent.export.is_none());
            assert!(!answers.exists());
        }

        #[test]
        fn test_send_file_dry_run_makes_no_calls() {
            let dir = tempdir().unwrap();
            write_table(dir.path(), "lead.csv");
            let answers = dir.path().join("answers");

            let clients = [FakeClient::new("claude", false)];
            let sent = send_file(
                &dir.path().join("lead.csv"),
                &clients,
                &CompletionConfig::default(),
                &config(&answers).with_dry_run(true),
            )
            .unwrap();

            assert_eq!(clients[0].calls.get(), 0);
            assert!(matches!(sent.replies[0].outcome, ReplyOutcome::DryRun));
            assert_eq!(sent.replies[0].payload["messages"][0]["content"], "Oi");
            assert!(sent.export.is_none());
        }

        #[test]
        fn test_send_directory_counts() {
            let dir = tempdir().unwrap();
            write_table(dir.path(), "a.csv");
            fs::write(dir.path().join("b.csv"), "date,time,sender,message\n").unwrap();
            write_table(dir.path(), "c.csv");
            let answers = dir.path().join("answers");

            let clients = vec![Box::new(FakeClient::new("claude", false)) as Box<dyn CompletionClient>];
            let mut order = Vec::new();
            let summary = send_directory(
                dir.path(),
                &clients,
                &CompletionConfig::default(),
                &config(&answers),
                |path, _| order.push(path.file_name().unwrap().to_string_lossy().into_owned()),
            )
            .unwrap();

            assert_eq!(
                summary,
                BatchSummary {
                    discovered: 3,
                    processed: 2,
                    failed: 1
                }
            );
            assert_eq!(order, vec!["a.csv", "b.csv", "c.csv"]);
            assert_eq!(fs::read_dir(&answers).unwrap().count(), 2);
        }
    }
}
