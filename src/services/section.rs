use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tokio::sync::broadcast;
use crate::sources::QueryError;

/// The four view sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Swaps,
    Tokens,
    Pools,
    Protocol,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Swaps,
        SectionKind::Tokens,
        SectionKind::Pools,
        SectionKind::Protocol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Swaps => "swaps",
            SectionKind::Tokens => "tokens",
            SectionKind::Pools => "pools",
            SectionKind::Protocol => "protocol",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Swaps => "Swap Volume",
            SectionKind::Tokens => "Top Tokens by Volume",
            SectionKind::Pools => "Top Pairs by Volume",
            SectionKind::Protocol => "Protocol",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown section `{}`", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionState<T> {
    Pending,
    Failed { message: String },
    Succeeded { data: T },
}

impl<T> SectionState<T> {
    pub fn status(&self) -> SectionStatus {
        match self {
            SectionState::Pending => SectionStatus::Pending,
            SectionState::Failed { .. } => SectionStatus::Failed,
            SectionState::Succeeded { .. } => SectionStatus::Succeeded,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            SectionState::Succeeded { data } => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Pending,
    Failed,
    Succeeded,
}

/// Published once per state transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEvent {
    pub section: SectionKind,
    pub status: SectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub records: usize,
    pub timestamp: i64,
}

/// Anything a section holds can report how many records it carries.
pub trait RecordCount {
    fn record_count(&self) -> usize;
}

/// One view section's state. Writers go through `begin`/`resolve`, which
/// publish the transition on the shared event channel.
pub struct Section<T> {
    kind: SectionKind,
    state: RwLock<SectionState<T>>,
    events: broadcast::Sender<SectionEvent>,
}

impl<T: Clone + RecordCount> Section<T> {
    pub fn new(kind: SectionKind, events: broadcast::Sender<SectionEvent>) -> Self {
        Self {
            kind,
            state: RwLock::new(SectionState::Pending),
            events,
        }
    }

    pub fn state(&self) -> SectionState<T> {
        self.state.read().clone()
    }

    pub fn status(&self) -> SectionStatus {
        self.state.read().status()
    }

    pub fn begin(&self) {
        *self.state.write() = SectionState::Pending;
        self.publish(SectionStatus::Pending, None, 0);
    }

    /// Errors stop here: they become the section's message.
    pub fn resolve(&self, result: Result<T, QueryError>) {
        match result {
            Ok(data) => {
                let records = data.record_count();
                *self.state.write() = SectionState::Succeeded { data };
                tracing::debug!("Section {} loaded ({} records)", self.kind, records);
                self.publish(SectionStatus::Succeeded, None, records);
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Section {} failed: {}", self.kind, message);
                *self.state.write() = SectionState::Failed { message: message.clone() };
                self.publish(SectionStatus::Failed, Some(message), 0);
            }
        }
    }

    /// Modify loaded data in place. No-op unless the section succeeded.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let records = {
            let mut state = self.state.write();
            match &mut *state {
                SectionState::Succeeded { data } => {
                    f(data);
                    data.record_count()
                }
                _ => return false,
            }
        };
        self.publish(SectionStatus::Succeeded, None, records);
        true
    }

    fn publish(&self, status: SectionStatus, message: Option<String>, records: usize) {
        // no subscribers is fine
        let _ = self.events.send(SectionEvent {
            section: self.kind,
            status,
            message,
            records,
            timestamp: chrono::Utc::now().timestamp(),
        });
    }
}

impl<T> RecordCount for Vec<T> {
    fn record_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> (Section<Vec<u32>>, broadcast::Receiver<SectionEvent>) {
        let (tx, rx) = broadcast::channel(16);
        (Section::new(SectionKind::Tokens, tx), rx)
    }

    #[test]
    fn starts_pending() {
        let (section, _rx) = section();
        assert_eq!(section.state(), SectionState::Pending);
    }

    #[test]
    fn success_publishes_one_event() {
        let (section, mut rx) = section();
        section.resolve(Ok(vec![1, 2, 3]));

        assert_eq!(section.state().data(), Some(&vec![1, 2, 3]));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.section, SectionKind::Tokens);
        assert_eq!(event.status, SectionStatus::Succeeded);
        assert_eq!(event.records, 3);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failure_keeps_the_reason() {
        let (section, mut rx) = section();
        section.resolve(Err(QueryError::Network("connection refused".into())));

        match section.state() {
            SectionState::Failed { message } => assert!(message.contains("connection refused")),
            other => panic!("unexpected state {:?}", other),
        }
        let event = rx.try_recv().unwrap();
        assert_eq!(event.status, SectionStatus::Failed);
        assert!(event.message.unwrap().contains("connection refused"));
    }

    #[test]
    fn update_requires_success() {
        let (section, _rx) = section();
        assert!(!section.update(|v| v.push(1)));
        section.resolve(Ok(vec![]));
        assert!(section.update(|v| v.push(1)));
        assert_eq!(section.state().data(), Some(&vec![1]));
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let state: SectionState<Vec<u32>> = SectionState::Failed { message: "boom".into() };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({ "status": "failed", "message": "boom" })
        );
    }

    #[test]
    fn section_names_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>().unwrap(), kind);
        }
        assert!("charts".parse::<SectionKind>().is_err());
    }
}
