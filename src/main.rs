use std::process::ExitCode;

use clap::Parser;

use transdesk::cli::{Cli, Command};
use transdesk::config::DeskConfig;
use transdesk::desk::{WorkDesk, WorkUpdate};
use transdesk::error::DeskError;
use transdesk::lifecycle::NewWork;
use transdesk::logging::init_logging;
use transdesk::permissions::Actor;
use transdesk::store::{JsonFileStore, WorkFilter};
use transdesk::translator::{Translator, TranslatorRoster};
use transdesk::ui::Printer;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = DeskConfig::load()?;
    if let Some(path) = cli.data_file.clone() {
        config.data_file = path;
    }
    init_logging(&config.log_level, cli.verbose);

    let printer = Printer::new();
    match run(cli, &config, &printer) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            printer.error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(cli: Cli, config: &DeskConfig, printer: &Printer) -> Result<(), DeskError> {
    if let Command::States = cli.command {
        printer.registry();
        return Ok(());
    }

    let actor = match (cli.actor, cli.role) {
        (Some(id), Some(role)) => Actor::new(id, role),
        _ => {
            return Err(DeskError::Invalid(
                "--actor and --role are required for this command".into(),
            ));
        }
    };
    let mut desk = WorkDesk::new(JsonFileStore::open(&config.data_file));
    if config.translators_file.exists() || matches!(cli.command, Command::AddTranslator { .. }) {
        desk = desk.with_roster(TranslatorRoster::load(&config.translators_file)?);
    }

    match cli.command {
        Command::Create {
            name,
            author,
            original_name,
            source_language,
            target_language,
            pages,
            words,
            priority,
            translator,
        } => {
            let new = NewWork {
                name,
                name_original: original_name.unwrap_or_default(),
                author: author.unwrap_or_default(),
                source_language: Some(
                    source_language.unwrap_or_else(|| config.default_source_language.clone()),
                ),
                target_language: Some(
                    target_language.unwrap_or_else(|| config.default_target_language.clone()),
                ),
                page_count: pages,
                word_count: words,
                description: String::new(),
                priority: priority.into(),
                translator,
            };
            let work = desk.create(&actor, new)?;
            printer.done("Created", &work);
            println!("  {}", work.id);
        }
        Command::List {
            all,
            state,
            translator,
            priority,
        } => {
            let filter = WorkFilter {
                include_inactive: all,
                state,
                translator,
                priority: priority.map(Into::into),
            };
            printer.list(&desk.list(&actor, &filter)?);
        }
        Command::Show { id } => printer.work(&desk.get(&actor, &id)?),
        Command::Approve { id } => printer.done("Approved", &desk.approve(&actor, &id)?),
        Command::AssignTranslator { id, translator } => {
            let work = desk.assign_translator(&actor, &id, translator.as_deref())?;
            printer.done("Translator assigned", &work);
        }
        Command::StartTrial { id } => {
            printer.done("Trial started", &desk.start_trial(&actor, &id)?)
        }
        Command::SetPriority { id, priority } => {
            let work = desk.set_priority(&actor, &id, priority.into())?;
            printer.done("Priority set", &work);
        }
        Command::Update {
            id,
            name,
            author,
            description,
            notes,
            pages,
            words,
        } => {
            let update = WorkUpdate {
                name,
                author,
                description,
                notes,
                page_count: pages,
                word_count: words,
            };
            printer.done("Updated", &desk.update_details(&actor, &id, update)?);
        }
        Command::Deactivate { id } => {
            printer.done("Deactivated", &desk.deactivate(&actor, &id)?)
        }
        Command::Can { operation, work } => {
            printer.permission(desk.can(&actor, operation, work.as_deref())?)
        }
        Command::Translators => printer.translators(&desk.translators(&actor)?),
        Command::AddTranslator {
            id,
            name,
            email,
            phone,
        } => {
            let mut translator = Translator::new(id, name);
            translator.email = email;
            translator.phone = phone;
            let added = desk.register_translator(&actor, translator)?;
            println!("  ✓ Translator registered: {} ({})", added.full_name, added.id);
        }
        Command::States => printer.registry(),
    }

    Ok(())
}
