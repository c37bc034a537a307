//! # chatctx CLI
//!
//! Command-line interface for the chatctx library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::warn;

use chatctx::ChatctxError;
use chatctx::batch::{
    BatchSummary, ConvertedFile, ReplyOutcome, SentFile, convert_directory, send_directory,
};
use chatctx::cli::{Args, Command, ConvertArgs, SendArgs};
use chatctx::client::{ClaudeClient, CompletionClient, GptClient};
use chatctx::format::OutputFormat;
use chatctx::logging::init_logging;
use chatctx::parsers::TranscriptParser;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, ChatctxError> {
    let args = <Args as ClapParser>::parse();
    init_logging(args.log_level.as_deref(), args.no_color)?;

    println!("📦 chatctx v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let summary = match &args.command {
        Command::Convert(convert) => run_convert(convert)?,
        Command::Send(send) => run_send(send)?,
    };

    Ok(exit_code(&summary))
}

fn exit_code(summary: &BatchSummary) -> i32 {
    i32::from(summary.all_failed())
}

fn run_convert(args: &ConvertArgs) -> Result<BatchSummary, ChatctxError> {
    let start = Instant::now();
    let output_dir = args.output_dir();
    let format: OutputFormat = args.format.into();
    let roles = args.role_map()?;
    let parser = TranscriptParser::with_config(args.transcript_config());

    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_dir.display());
    println!("📄 Format:  {}", format);
    println!(
        "🤖 Assistant: {}",
        roles.assistants().collect::<Vec<_>>().join(", ")
    );
    println!();

    let summary = convert_directory(
        &args.input,
        &output_dir,
        &parser,
        &roles,
        format,
        print_converted,
    )?;

    if summary.is_empty() {
        println!("No .txt files found in {}", args.input.display());
        return Ok(summary);
    }

    print_summary(&summary, start);
    Ok(summary)
}

fn print_converted(path: &Path, outcome: &Result<ConvertedFile, ChatctxError>) {
    println!("⏳ Processing file: {}", file_name(path));
    match outcome {
        Ok(converted) => {
            println!(
                "   Wrote {} messages to {}",
                converted.messages,
                converted.tables.messages.display()
            );
            println!(
                "   Wrote {} context messages to {}",
                converted.messages,
                converted.tables.context.display()
            );
        }
        Err(e) => eprintln!("   ⚠️  Skipped {}: {}", file_name(path), e),
    }
}

fn run_send(args: &SendArgs) -> Result<BatchSummary, ChatctxError> {
    let start = Instant::now();
    let completion = args.completion_config();
    let send = args.send_config();

    let claude = ClaudeClient::new(args.claude_config())?;
    let gpt = GptClient::new(args.openai_config())?;
    if !send.dry_run {
        for (name, ready, var) in [
            ("Claude", claude.has_api_key(), &args.claude_key_env),
            ("GPT", gpt.has_api_key(), &args.openai_key_env),
        ] {
            if !ready {
                warn!(env_var = %var, "no {} API key configured; its requests will fail", name);
            }
        }
    }
    let clients: Vec<Box<dyn CompletionClient>> = vec![Box::new(claude), Box::new(gpt)];

    println!("📂 Folder:  {}", args.folder.display());
    println!("🤖 Models:  {} / {}", args.model, args.gpt_model);
    if send.dry_run {
        println!("🧪 Mode:    dry run (no API calls)");
    } else {
        println!("💾 Answers: {}", send.answers_dir.display());
    }
    println!();

    let summary = send_directory(&args.folder, &clients, &completion, &send, print_sent)?;

    if summary.is_empty() {
        println!("No CSV files found in folder: {}", args.folder.display());
        return Ok(summary);
    }

    print_summary(&summary, start);
    Ok(summary)
}

fn print_sent(path: &Path, outcome: &Result<SentFile, ChatctxError>) {
    println!("{}", "=".repeat(50));
    println!("Processing: {}", file_name(path));
    println!("{}", "=".repeat(50));

    let sent = match outcome {
        Ok(sent) => sent,
        Err(e) => {
            eprintln!("⚠️  Error reading CSV {}: {}", file_name(path), e);
            return;
        }
    };

    for reply in &sent.replies {
        match &reply.outcome {
            ReplyOutcome::DryRun => {
                println!("Payload for {} ({}):", file_name(path), reply.display_name);
                match serde_json::to_string_pretty(&reply.payload) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("⚠️  Could not render payload: {e}"),
                }
            }
            ReplyOutcome::Completed(completion) => {
                println!("\n=== {} Reply ===\n", reply.display_name);
                let text = completion.text.trim();
                println!("{}", if text.is_empty() { "(no text content)" } else { text });
            }
            ReplyOutcome::Failed(e) => {
                eprintln!("⚠️  {} API error for {}: {}", reply.display_name, file_name(path), e);
            }
        }
    }

    if let Some(export) = &sent.export {
        println!("\n=======================\n");
        println!("✅ Combined AI responses exported to: {}", export.display());
    }
    println!();
}

fn print_summary(summary: &BatchSummary, start: Instant) {
    println!("📊 Summary:");
    println!("   Found:     {} files", summary.discovered);
    println!("   Processed: {}", summary.processed);
    println!("   Skipped:   {}", summary.failed);
    println!("   Time:      {:.2}s", start.elapsed().as_secs_f64());
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
