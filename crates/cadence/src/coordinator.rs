//! One coordination scope: a hub with its invoker, router and journal

use crate::config::CadenceConfig;
use crate::error::{Error, Result};
use cadence_hub::Hub;
use cadence_invoker::{Command, CommandOutcome, Invoker};
use cadence_journal::{AuditReport, Auditor, ExportFormat, Exporter, Journal};
use cadence_router::{Chain, Request, RouteOutcome, Router};
use std::sync::Arc;
use tracing::debug;

/// Bundles the components that share one hub
///
/// The hub is created here and handed to the invoker and the router; it
/// never references them back. Dropping the coordinator releases every
/// subscription once no other `Arc<Hub>` is alive.
pub struct Coordinator {
    hub: Arc<Hub>,
    invoker: Invoker,
    router: Router,
    journal: Option<Arc<Journal>>,
}

impl Coordinator {
    /// Create a scope with the default configuration and no journal
    pub fn new() -> Self {
        Self::from_config(CadenceConfig::default())
    }

    /// Build a hub, invoker and router from `config`
    ///
    /// When `config.journal` is set, a journal is attached to the hub before
    /// anything else can publish.
    pub fn from_config(config: CadenceConfig) -> Self {
        let hub = Hub::shared(config.hub);
        let invoker = Invoker::with_config(hub.clone(), config.invoker);
        let router = Router::new(hub.clone());
        let journal = config.journal.map(|journal_config| {
            let journal = Arc::new(Journal::with_config(journal_config));
            journal.attach(&hub);
            journal
        });
        debug!(
            hub = %hub.config().label(),
            journal = journal.is_some(),
            "Coordinator::from_config"
        );
        Self {
            hub,
            invoker,
            router,
            journal,
        }
    }

    /// The shared notification hub
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The attached journal, if one was configured
    pub fn journal(&self) -> Option<&Arc<Journal>> {
        self.journal.as_ref()
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Shortcut for [`Invoker::execute`]
    pub fn execute(&self, command: impl Command + 'static) -> CommandOutcome {
        self.invoker.execute(command)
    }

    /// Shortcut for [`Invoker::undo`]
    pub fn undo(&self) -> Result<CommandOutcome> {
        Ok(self.invoker.undo()?)
    }

    pub fn redo(&self) -> CommandOutcome {
        self.invoker.redo()
    }

    /// Shortcut for [`Router::dispatch`]
    pub fn dispatch(&self, chain: &Chain, request: &Request) -> RouteOutcome {
        self.router.dispatch(chain, request)
    }

    /// Audit report over everything the journal recorded so far
    pub fn audit(&self) -> Result<AuditReport> {
        let journal = self.journal.as_ref().ok_or(Error::JournalDisabled)?;
        Ok(Auditor::new(journal).generate_report())
    }

    /// Export the journal in the given format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let journal = self.journal.as_ref().ok_or(Error::JournalDisabled)?;
        Ok(Exporter::new(journal).export(format)?)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("hub", &self.hub)
            .field("invoker", &self.invoker)
            .field("journal", &self.journal.as_ref().map(|j| j.stats()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_invoker::FnCommand;

    #[test]
    fn test_journal_absent_by_default() {
        let coordinator = Coordinator::new();
        assert!(coordinator.journal().is_none());
        assert!(matches!(coordinator.audit(), Err(Error::JournalDisabled)));
        assert_eq!(coordinator.hub().total_subscriptions(), 0);
    }

    #[test]
    fn test_journal_sees_invoker_and_router() {
        let coordinator = Coordinator::from_config(CadenceConfig::default().with_journal());
        coordinator.execute(FnCommand::new("noop", || Ok(()), || Ok(())));
        coordinator.undo().unwrap();
        coordinator.dispatch(&Chain::empty(), &Request::new("lost"));

        let report = coordinator.audit().unwrap();
        assert_eq!(report.total_entries, 3);
        assert_eq!(report.unhandled_count, 1);
        assert!(coordinator.export(ExportFormat::Csv).unwrap().contains("noop"));
    }
}
