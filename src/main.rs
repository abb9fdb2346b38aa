//! # chatdoc CLI
//!
//! Command-line interface for the chatdoc library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use env_logger::Env;

use chatdoc::ChatdocError;
use chatdoc::cli::Args;
use chatdoc::core::{Checkpoint, apply_filters};
use chatdoc::format::{OutputFormat, write_to_format};
use chatdoc::parser::TranscriptParser;
use chatdoc::reader::read_lines;

fn main() {
    let args = <Args as ClapParser>::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ChatdocError> {
    let total_start = Instant::now();

    // Validate everything before touching the input
    let parser_config = args.parser_config()?;
    let filter_config = args.filter_config()?;
    let output_config = args.output_config();
    let format: OutputFormat = args.format.into();
    let output_path = args.output_path();
    args.check_output_path(&output_path)?;
    let source_id = args.source_id();

    println!("📦 chatdoc v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    println!("🕒 Offset:  {}", parser_config.offset());
    if let Some(ref after) = args.after {
        println!("📅 After:   {}", after);
    }
    if let Some(ref before) = args.before {
        println!("📅 Before:  {}", before);
    }
    if !args.from.is_empty() {
        println!("👤 From:    {}", args.from.join(", "));
    }
    println!();

    // Step 1: Read and parse
    println!("⏳ Parsing...");
    let parse_start = Instant::now();
    let lines = read_lines(&args.input, &args.reader_config())?;
    let transcript = TranscriptParser::with_config(parser_config).parse_lines(&source_id, lines)?;
    let (messages, metadata) = transcript.into_parts();
    println!(
        "   {} lines → {} messages ({:.2}s)",
        metadata.total_lines(),
        metadata.accepted(),
        parse_start.elapsed().as_secs_f64()
    );

    // Step 2: Sender/date filter
    let messages = if filter_config.is_active() {
        println!("🔍 Filtering messages...");
        let filtered = apply_filters(messages, &filter_config);
        println!("   {} messages after filtering", filtered.len());
        filtered
    } else {
        messages
    };
    let selected_count = messages.len();

    // Step 3: Skip what a previous run already wrote
    let mut checkpoint = match &args.checkpoint {
        Some(path) => Some(Checkpoint::load(path)?),
        None => None,
    };
    let messages = match &checkpoint {
        Some(cp) => {
            let fresh = cp.retain_new(messages);
            println!(
                "🧾 Checkpoint: {} already exported, {} new",
                selected_count - fresh.len(),
                fresh.len()
            );
            fresh
        }
        None => messages,
    };

    // Step 4: Write output
    println!("💾 Writing {}...", format);
    write_to_format(&messages, &output_path, format, &output_config)?;

    // Step 5: Remember what was written
    if let Some(cp) = checkpoint.as_mut() {
        cp.record(&messages);
        cp.save()?;
    }

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    println!();
    println!("📊 Summary:");
    println!("   Lines:     {}", metadata.total_lines());
    println!("   Accepted:  {}", metadata.accepted());
    println!("   Failed:    {}", metadata.failed());
    println!("   Filtered:  {}", metadata.filtered());
    println!("   Written:   {}", messages.len());
    println!();
    println!(
        "⚡ Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}
