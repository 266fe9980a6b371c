use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use reqwest::Client;

use crate::{
    ai,
    api::{HistoryBackend, HttpBackend},
    config::AppConfig,
    console::{self, render, Command, Console},
    domain::{RecordId, SessionState, SharedState},
    history::{export, ClassificationWorkflow, ClearOutcome, HistoryStore},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
};

const CLEAR_QUESTION: &str = "Are you sure you want to delete all history?";

pub struct LedgerApp {
    paths: ResolvedPaths,
    state: SharedState,
    store: HistoryStore,
    workflow: ClassificationWorkflow,
    shutdown: Shutdown,
}

impl LedgerApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(format!("spam-ledger/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.api.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let backend: Arc<dyn HistoryBackend> =
            Arc::new(HttpBackend::new(http_client.clone(), &config.api));
        let classifier = ai::build_classifier(http_client, &config);

        let state = SessionState::shared();
        let store = HistoryStore::new(state.clone(), backend.clone());
        let workflow = ClassificationWorkflow::new(state.clone(), classifier, backend);

        tracing::info!(
            backend = %config.api.base_url,
            classifier = ?config.classifier.kind,
            "session initialized"
        );

        Ok(Self {
            paths,
            state,
            store,
            workflow,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let mut console = Console::stdin(self.shutdown.subscribe())?;
        let mut shutdown_listener = self.shutdown.subscribe();

        // Background refresh: a failure here is logged, not shown.
        if shutdown_listener.guard(self.store.load()).await.is_none() {
            tracing::info!(target: "console", "shutdown requested during startup load");
            tracing::info!("session closed");
            return Ok(());
        }

        println!("spam-ledger: paste email text to classify it as Spam or Ham.");
        println!("{} entries in history. Type `help` for commands.", self.store.records().len());

        loop {
            console.prompt("> ")?;
            let Some(line) = console.read_line().await else {
                break;
            };
            let command = match console::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }

            match shutdown_listener.guard(self.dispatch(command, &mut console)).await {
                Some(Ok(())) => {}
                Some(Err(err)) => {
                    tracing::error!(target: "console", error = %err, "command failed");
                }
                None => {
                    tracing::info!(target: "console", "shutdown requested during command");
                    break;
                }
            }
        }

        self.shutdown.trigger();
        tracing::info!("session closed");
        Ok(())
    }

    async fn dispatch(&self, command: Command, console: &mut Console) -> Result<()> {
        match command {
            Command::Classify(text) => self.classify(&text).await,
            Command::Paste => {
                println!("Paste email text; finish with a line containing only `.`");
                match console.read_block().await? {
                    Some(text) => self.classify(&text).await,
                    None => Ok(()),
                }
            }
            Command::History => {
                println!("{}", render::history(&self.store.records()));
                Ok(())
            }
            Command::Show(id) => {
                self.show(id);
                Ok(())
            }
            Command::Delete(id) => {
                let _ = self.store.delete(id).await;
                self.print_feedback();
                Ok(())
            }
            Command::Clear => {
                let confirmed = console.confirm(CLEAR_QUESTION).await?;
                if let Ok(ClearOutcome::Cancelled) = self.store.clear(confirmed).await {
                    println!("Clear cancelled.");
                    return Ok(());
                }
                self.print_feedback();
                Ok(())
            }
            Command::Export(path) => self.export(path).await,
            Command::Reload => {
                match self.store.load().await {
                    Ok(count) => println!("{count} entries in history."),
                    Err(_) => println!("Failed to load history."),
                }
                Ok(())
            }
            Command::Help => {
                println!("{}", render::HELP);
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    async fn classify(&self, text: &str) -> Result<()> {
        if self.workflow.precheck(text).is_ok() {
            println!("Classifying...");
        }
        if let Err(err) = self.workflow.submit(text).await {
            tracing::debug!(target: "console", error = %err, "submit did not complete");
        }
        self.print_feedback();
        Ok(())
    }

    fn show(&self, id: RecordId) {
        match self.store.select(id) {
            Some(record) => {
                println!("{}", record.text);
                self.print_feedback();
            }
            None => println!("No history entry with id {id}."),
        }
    }

    async fn export(&self, path: Option<PathBuf>) -> Result<()> {
        let path = path.unwrap_or_else(|| self.paths.export_path.clone());
        let records = self.store.records();
        match export::write_csv(&path, &records).await {
            Ok(()) => println!("Exported {} entries to {}", records.len(), path.display()),
            Err(err) => {
                tracing::error!(target: "export", error = %err, "export failed");
                println!("Failed to export history.");
            }
        }
        Ok(())
    }

    fn print_feedback(&self) {
        let feedback = render::feedback(&self.state.lock());
        if !feedback.is_empty() {
            println!("{feedback}");
        }
    }
}
