//! Navigation between the dashboard screens.
//!
//! Every request gets a [`RequestTicket`]. Only the most recent ticket may
//! move the machine out of `Loading`; answers to superseded requests are
//! reported as [`Transition::Stale`] and dropped.

use analysis_core::{AnalysisResult, NewsCategory, NewsFeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analysis,
    News(NewsCategory),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    #[default]
    Home,
    Loading {
        ticket: RequestTicket,
        kind: RequestKind,
        /// Where a failed request returns to.
        previous: Box<View>,
    },
    Results(Box<AnalysisResult>),
    News {
        category: NewsCategory,
        feed: NewsFeed,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Loading { .. } => "loading",
            View::Results(_) => "results",
            View::News { .. } => "news",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct ViewMachine {
    state: View,
    last_ticket: u64,
}

impl ViewMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &View {
        &self.state
    }

    pub fn pending(&self) -> Option<RequestTicket> {
        match &self.state {
            View::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Enter `Loading` for a new request. A request started while another
    /// is pending supersedes it and inherits its rollback target.
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.last_ticket += 1;
        let ticket = RequestTicket(self.last_ticket);

        let previous = match std::mem::take(&mut self.state) {
            View::Loading { previous, .. } => previous,
            other => Box::new(other),
        };
        tracing::debug!("{:?} started ({:?}), returning to {} on failure", ticket, kind, previous.name());

        self.state = View::Loading {
            ticket,
            kind,
            previous,
        };
        ticket
    }

    pub fn resolve_analysis(&mut self, ticket: RequestTicket, result: AnalysisResult) -> Transition {
        if !self.is_pending(ticket) {
            tracing::debug!("Dropping stale analysis for {:?}", ticket);
            return Transition::Stale;
        }
        self.state = View::Results(Box::new(result));
        Transition::Applied
    }

    pub fn resolve_news(
        &mut self,
        ticket: RequestTicket,
        category: NewsCategory,
        feed: NewsFeed,
    ) -> Transition {
        if !self.is_pending(ticket) {
            tracing::debug!("Dropping stale news for {:?}", ticket);
            return Transition::Stale;
        }
        self.state = View::News { category, feed };
        Transition::Applied
    }

    /// Roll back to the pre-request view. Returns the alert text, or `None`
    /// when the ticket is no longer current.
    pub fn fail(&mut self, ticket: RequestTicket, message: impl Into<String>) -> Option<String> {
        if !self.is_pending(ticket) {
            return None;
        }
        if let View::Loading { previous, .. } = std::mem::take(&mut self.state) {
            self.state = *previous;
        }
        Some(message.into())
    }

    pub fn go_home(&mut self) {
        self.state = View::Home;
    }

    fn is_pending(&self, ticket: RequestTicket) -> bool {
        self.pending() == Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Fundamentals;

    fn result(ticker: &str) -> AnalysisResult {
        AnalysisResult {
            ticker: ticker.to_string(),
            current_price: 100.0,
            price_change: 0.5,
            final_score: 0.7,
            sentiment_score: 0.6,
            technical_score: 0.7,
            fundamental_score: 0.8,
            fundamentals: Fundamentals::default(),
            suggested_threshold: None,
            articles: Vec::new(),
        }
    }

    #[test]
    fn test_starts_at_home() {
        let machine = ViewMachine::new();
        assert_eq!(machine.state(), &View::Home);
        assert_eq!(machine.pending(), None);
    }

    #[test]
    fn test_successful_analysis() {
        let mut machine = ViewMachine::new();
        let ticket = machine.begin(RequestKind::Analysis);
        assert_eq!(machine.state().name(), "loading");

        assert_eq!(machine.resolve_analysis(ticket, result("TCS")), Transition::Applied);
        assert!(matches!(machine.state(), View::Results(r) if r.ticker == "TCS"));
    }

    #[test]
    fn test_failure_rolls_back_to_previous_view() {
        let mut machine = ViewMachine::new();
        let first = machine.begin(RequestKind::Analysis);
        machine.resolve_analysis(first, result("TCS"));

        let second = machine.begin(RequestKind::Analysis);
        assert_eq!(machine.fail(second, "Something went wrong").as_deref(), Some("Something went wrong"));
        assert!(matches!(machine.state(), View::Results(r) if r.ticker == "TCS"));
    }

    #[test]
    fn test_superseded_request_is_stale() {
        let mut machine = ViewMachine::new();
        let first = machine.begin(RequestKind::Analysis);
        let second = machine.begin(RequestKind::News(NewsCategory::World));
        assert!(second > first);

        assert_eq!(machine.resolve_analysis(first, result("OLD")), Transition::Stale);
        assert_eq!(machine.fail(first, "late failure"), None);
        assert_eq!(machine.pending(), Some(second));

        let applied = machine.resolve_news(second, NewsCategory::World, NewsFeed::default());
        assert_eq!(applied, Transition::Applied);
        assert!(matches!(machine.state(), View::News { category: NewsCategory::World, .. }));
    }

    #[test]
    fn test_superseding_request_keeps_first_rollback_target() {
        let mut machine = ViewMachine::new();
        let news = machine.begin(RequestKind::News(NewsCategory::Indian));
        machine.resolve_news(news, NewsCategory::Indian, NewsFeed::default());

        machine.begin(RequestKind::Analysis);
        let latest = machine.begin(RequestKind::Analysis);
        machine.fail(latest, "boom");
        assert!(matches!(machine.state(), View::News { category: NewsCategory::Indian, .. }));
    }

    #[test]
    fn test_go_home_makes_pending_request_stale() {
        let mut machine = ViewMachine::new();
        let ticket = machine.begin(RequestKind::Analysis);
        machine.go_home();

        assert_eq!(machine.resolve_analysis(ticket, result("TCS")), Transition::Stale);
        assert_eq!(machine.state(), &View::Home);
    }

    #[test]
    fn test_resolved_ticket_cannot_be_reused() {
        let mut machine = ViewMachine::new();
        let ticket = machine.begin(RequestKind::Analysis);
        machine.resolve_analysis(ticket, result("TCS"));
        assert_eq!(machine.resolve_analysis(ticket, result("AGAIN")), Transition::Stale);
        assert_eq!(machine.fail(ticket, "x"), None);
    }
}
