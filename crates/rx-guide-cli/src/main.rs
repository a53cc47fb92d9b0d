//! `rx-guide`: prescription photo in, plain-language guide out.
//!
//! Usage:
//!   rx-guide analyze <image> [--language hi] [--output guide.md] [--voice]
//!   rx-guide times "twice daily after food" [--count 2]
//!   rx-guide interactions Augmentin Eroflam [--json]
//!   rx-guide languages

mod config;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use rx_guide_core::{
    alarm_plan, check_interactions, normalize_drug_names, render_report, suggest_times,
    AnalysisOutcome, InteractionTable, Language, SessionContext,
};
use rx_guide_llm::{synthesize, Analyzer, GeminiClient, GoogleTranslateTts, ImageInput};
use tracing_subscriber::EnvFilter;

use config::{Cli, Commands, ModelArgs, DEFAULT_LOG_FILTER};

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            image,
            output,
            language,
            voice,
            audio_dir,
            model,
        } => cmd_analyze(&image, output.as_deref(), language, voice.then_some(audio_dir.as_path()), &model),
        Commands::Times {
            instructions,
            count,
        } => {
            cmd_times(&instructions, count);
            Ok(())
        }
        Commands::Interactions { names, json } => cmd_interactions(&names, json),
        Commands::Languages => {
            for lang in Language::ALL {
                println!("{:<4} {}", lang.code(), lang.label());
            }
            Ok(())
        }
    }
}

fn cmd_analyze(
    image_path: &Path,
    output: Option<&Path>,
    language: Language,
    audio_dir: Option<&Path>,
    model_args: &ModelArgs,
) -> Result<()> {
    let image = ImageInput::from_path(image_path)?;
    let config = model_args.gemini_config()?;
    let client = GeminiClient::new(config)?;
    tracing::info!(model = client.model(), language = %language, "Analyzing prescription");
    let mut session = SessionContext::new();
    let outcome = Analyzer::new(&client).analyze(&image, language, &mut session)?;

    let mut guide = outcome.document.render();
    guide.push_str("\n---\n\n");
    guide.push_str(&outcome.interaction_report);
    guide.push('\n');
    guide.push_str(&reminder_section(&session));

    match output {
        Some(path) => {
            fs::write(path, &guide)
                .with_context(|| format!("Failed to write guide to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Guide written");
        }
        None => print!("{guide}"),
    }

    if let Some(dir) = audio_dir {
        write_voice_guidance(&outcome, dir, model_args.timeout_secs)?;
    }
    Ok(())
}

/// Suggested alarms for each medicine, as a starting point for reminders.
fn reminder_section(session: &SessionContext) -> String {
    let mut section = String::from("\n---\n\n### ⏰ Suggested Reminders\n\n");
    for name in session.medicine_names() {
        let count = session
            .medicine(name)
            .map(|item| suggest_times(&item.instructions).len())
            .unwrap_or(1);
        if let Ok(draft) = session.reminder_draft(name, count) {
            let times: Vec<String> = draft.times.iter().map(ToString::to_string).collect();
            section.push_str(&format!("- **{}**: {}\n", draft.medicine_name, times.join(", ")));
        }
    }
    section
}

fn write_voice_guidance(outcome: &AnalysisOutcome, dir: &Path, timeout_secs: u64) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create audio directory {}", dir.display()))?;
    let tts = GoogleTranslateTts::new(timeout_secs)?;
    let lang = outcome.language.code();

    let mut sections = vec![("patient.mp3".to_string(), outcome.document.header.clone())];
    for (i, card) in outcome.document.cards.iter().enumerate() {
        sections.push((format!("medicine-{}.mp3", i + 1), card.text.clone()));
    }
    sections.push(("interactions.mp3".to_string(), outcome.interaction_report.clone()));

    for (file, text) in sections {
        match synthesize(&text, lang, &tts) {
            Ok(audio) => {
                let path = dir.join(&file);
                fs::write(&path, audio)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "Voice guidance written");
            }
            Err(e) => tracing::warn!(file = %file, error = %e, "No voice guidance for section"),
        }
    }
    Ok(())
}

fn cmd_times(instructions: &str, count: Option<usize>) {
    let times = match count {
        Some(count) => alarm_plan(instructions, count),
        None => suggest_times(instructions),
    };
    let times: Vec<String> = times.iter().map(ToString::to_string).collect();
    println!("{}", times.join(", "));
}

fn cmd_interactions(names: &[String], json: bool) -> Result<()> {
    let check = check_interactions(&normalize_drug_names(names), &InteractionTable::builtin());
    if json {
        println!("{}", check.to_json().context("Failed to serialize interaction check")?);
    } else {
        println!("{}", render_report(&check));
    }
    Ok(())
}
