use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use common::{ApiClient, ClientConfig};
use profile::{
    EditorError, HandleStatus, HttpProfileApi, ProfileDraft, ProfileEditor, ValidationReport,
    options::{self, SelectOption},
    validation::validate,
};

use crate::SIGN_IN_REQUIRED;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the current profile as an editable draft
    Show,
    /// Check whether a handle is still free
    CheckHandle { handle: String },
    /// Validate a draft file without sending it
    Validate { file: PathBuf },
    /// Validate a draft file and save it
    Save { file: PathBuf },
    /// List the values accepted by a profile field
    Options {
        #[arg(value_enum)]
        list: OptionList,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionList {
    Years,
    Months,
    Countries,
    Languages,
    Timezones,
    Levels,
    Weekdays,
}

pub async fn handle(client: ApiClient, config: &ClientConfig, cmd: Command) -> Result<()> {
    match &cmd {
        Command::Validate { file } => {
            let draft = read_draft(file)?;
            return report(&validate(&draft));
        }
        Command::Options { list } => {
            for (value, label) in option_rows(*list) {
                println!("{}\t{}", value, label);
            }
            return Ok(());
        }
        _ => {}
    }

    if !client.session().is_authenticated() {
        bail!(SIGN_IN_REQUIRED);
    }

    let api = Arc::new(HttpProfileApi::new(client));
    let mut editor = ProfileEditor::from_config(api, config);
    editor.load().await;

    if let Some(message) = editor.message() {
        eprintln!("{}", message);
    }

    match cmd {
        Command::Show => show(&editor),
        Command::CheckHandle { handle } => {
            editor.set_handle(&handle);
            let status = editor.settle_handle_check().await;
            println!("{}", describe_status(status));
            Ok(())
        }
        Command::Save { file } => {
            editor.replace_draft(read_draft(&file)?);
            editor.settle_handle_check().await;
            save(&mut editor).await
        }
        Command::Validate { .. } | Command::Options { .. } => Ok(()),
    }
}

fn show(editor: &ProfileEditor<HttpProfileApi>) -> Result<()> {
    if !editor.has_profile() {
        println!("No profile yet; showing defaults.");
    }
    println!("{}", serde_json::to_string_pretty(editor.draft())?);
    println!("Discoverable: {}", describe_discoverable(editor.discoverable()));
    Ok(())
}

async fn save(editor: &mut ProfileEditor<HttpProfileApi>) -> Result<()> {
    match editor.save().await {
        Ok(outcome) => {
            println!("{}", editor.message().unwrap_or_default());
            println!("Discoverable: {}", describe_discoverable(outcome.discoverable));
            Ok(())
        }
        Err(EditorError::Invalid(report)) => {
            print_errors(&report);
            bail!(EditorError::Invalid(report))
        }
        Err(e) => bail!(e),
    }
}

fn report(report: &ValidationReport) -> Result<()> {
    if report.is_valid() {
        println!("Draft is valid.");
        return Ok(());
    }
    print_errors(report);
    bail!("Please fix the highlighted fields.")
}

fn print_errors(report: &ValidationReport) {
    for (field, error) in report.iter() {
        eprintln!("{}: {}", field.as_str(), error);
    }
}

/// `(value, label)` pairs in display order
fn option_rows(list: OptionList) -> Vec<(String, String)> {
    let select = |options: Vec<SelectOption>| -> Vec<(String, String)> {
        options
            .into_iter()
            .map(|option| (option.value, option.label))
            .collect()
    };

    match list {
        OptionList::Years => select(options::current_year_options()),
        OptionList::Months => select(options::month_options()),
        OptionList::Countries => select(options::country_options(options::DEFAULT_COUNTRY_CODES)),
        OptionList::Languages => {
            select(options::language_options(options::DEFAULT_LANGUAGE_CODES))
        }
        OptionList::Timezones => select(options::timezone_options()),
        OptionList::Levels => (0u8..)
            .map_while(|level| {
                options::proficiency_label(level).map(|label| (level.to_string(), label.to_string()))
            })
            .collect(),
        OptionList::Weekdays => (0u8..)
            .map_while(|day| {
                options::weekday_label(day).map(|label| (day.to_string(), label.to_string()))
            })
            .collect(),
    }
}

fn read_draft(path: &Path) -> Result<ProfileDraft> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse draft in {}", path.display()))
}

fn describe_status(status: HandleStatus) -> &'static str {
    match status {
        HandleStatus::Idle => "No availability result for this handle.",
        HandleStatus::Invalid => "Handle can only use 3-20 letters and numbers.",
        HandleStatus::Checking => "Still checking handle availability.",
        HandleStatus::Available => "Handle is available.",
        HandleStatus::Unavailable => "Handle is already taken.",
    }
}

fn describe_discoverable(discoverable: Option<bool>) -> &'static str {
    match discoverable {
        Some(true) => "yes",
        Some(false) => "no, complete your profile to be matched",
        None => "unknown",
    }
}
