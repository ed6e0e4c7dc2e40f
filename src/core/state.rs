use super::{events::Event, models::{InterestingHost, Outcome, OutcomeStatus}};

/// Ledger of everything a run did; fed by events, read by the summary printer.
#[derive(Debug, Default)]
pub struct RunState {
    pub pipeline: &'static str,
    pub targets: usize,
    pub stages: Vec<&'static str>,
    pub outcomes: Vec<Outcome>,
    pub escalated: Vec<InterestingHost>,
}

impl RunState {
    pub fn new(pipeline: &'static str, targets: usize) -> Self {
        Self {
            pipeline,
            targets,
            ..Self::default()
        }
    }

    pub fn on_event(&mut self, ev: Event) {
        match ev {
            Event::StageStarted(stage) => {
                tracing::info!("Stage started: {}", stage);
                self.stages.push(stage);
            }
            Event::TaskCompleted(name) => {
                tracing::info!("Task completed: {}", name);
                self.outcomes.push(Outcome::succeeded(name));
            }
            Event::TaskFailed(e) => {
                tracing::warn!("Task failed: {}", e);
                if !e.command.is_empty() {
                    tracing::debug!("Failed command for {}: {}", e.name, e.command);
                }
                self.outcomes.push(Outcome::failed(e));
            }
            Event::HostEscalated(host) => {
                tracing::info!("Host escalated: {} ({})", host.host, host.port_list());
                self.escalated.push(host);
            }
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome.status {
            OutcomeStatus::Succeeded => self.on_event(Event::TaskCompleted(outcome.name)),
            OutcomeStatus::Failed(e) => self.on_event(Event::TaskFailed(e)),
        }
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}
