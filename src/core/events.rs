use super::errors::ExecError;
use super::models::InterestingHost;

#[derive(Debug, Clone)]
pub enum Event {
    StageStarted(&'static str),
    TaskCompleted(String),
    TaskFailed(ExecError),
    HostEscalated(InterestingHost),
}
