use clap::{value_parser, Arg, Command};
use draftform_core::{
    remove_record, EditorConfig, EditorSession, MemoryRecordStore, Record, RecordStore,
    SaveOutcome,
};
use draftform_field::ValidatorConfig;
use draftform_store::DraftStore;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Command::new("draftform")
        .version(draftform_core::VERSION)
        .about("Async uniqueness validation with client-side draft persistence")
        .subcommand(
            Command::new("demo")
                .about("Replay the organization editing scenario")
                .arg(
                    Arg::new("debounce-ms")
                        .long("debounce-ms")
                        .default_value("350")
                        .value_parser(value_parser!(u64))
                        .help("Debounce window for the async validator"),
                ),
        );

    let matches = cli.get_matches();
    let debounce_ms = match matches.subcommand() {
        Some(("demo", args)) => *args.get_one::<u64>("debounce-ms").unwrap(),
        _ => 350,
    };

    run_demo(Duration::from_millis(debounce_ms)).await
}

async fn run_demo(debounce: Duration) -> anyhow::Result<()> {
    let settle = debounce + Duration::from_millis(150);

    let store = Arc::new(MemoryRecordStore::seeded(vec![
        Record::with_id(1, "Good Toys"),
        Record::with_id(2, "Rapid Bikes"),
    ]));
    let records: Arc<dyn RecordStore> = store.clone();
    let drafts = Arc::new(DraftStore::in_memory());
    let config = EditorConfig::new()
        .with_module("organization")
        .with_validator(ValidatorConfig::new().with_debounce(debounce));

    let mut list = store.subscribe();
    println!("collection: {:?}", store.list().await);

    // A new organization typed over an existing name is blocked.
    let session = EditorSession::load(
        Record::new(""),
        Arc::clone(&records),
        Arc::clone(&drafts),
        config.clone(),
    )?;
    session.name_field().set_value("Good Toys");
    tokio::time::sleep(settle).await;
    println!(
        "typed `Good Toys`: valid={}, errors={:?}",
        session.is_valid(),
        session.name_field().errors().kinds().collect::<Vec<_>>()
    );
    println!("save: {:?}", session.save().await?);

    // A fresh name passes and is inserted with a new id.
    session.name_field().set_value("Fast Cars");
    tokio::time::sleep(settle).await;
    match session.save().await? {
        SaveOutcome::Saved(record) => println!("save `Fast Cars`: saved as {record:?}"),
        SaveOutcome::Blocked => println!("save `Fast Cars`: blocked"),
    }
    let _ = list.changed().await;
    println!("collection: {:?}", *list.borrow_and_update());
    drop(session);

    // An abandoned edit survives as a draft and is restored on reload.
    let session = EditorSession::load(
        Record::with_id(2, "Rapid Bikes"),
        Arc::clone(&records),
        Arc::clone(&drafts),
        config.clone(),
    )?;
    session.name_field().set_value("Rapid Bicycles");
    tokio::time::sleep(settle).await;
    drop(session); // abandon without saving

    let session = EditorSession::load(
        Record::with_id(2, "Rapid Bikes"),
        Arc::clone(&records),
        Arc::clone(&drafts),
        config.clone(),
    )?;
    println!("reloaded id=2: draft restored as `{}`", session.name_field().value());
    session.discard()?;
    println!("discarded: back to `{}`", session.name_field().value());
    drop(session);

    // Removing a record also drops any draft persisted for it.
    remove_record(&Record::with_id(1, "Good Toys"), &records, &drafts, &config).await?;
    println!("collection: {:?}", store.list().await);

    Ok(())
}
