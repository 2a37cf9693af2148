/// The three panels of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Entry,
    History,
    Charts,
}

impl View {
    pub const ALL: [View; 3] = [View::Entry, View::History, View::Charts];

    pub fn title(self) -> &'static str {
        match self {
            View::Entry => "New fill-up",
            View::History => "History",
            View::Charts => "Charts",
        }
    }
}

/// Side effect the caller must run when a view becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    ReloadHistory,
    ResetDate,
}

#[derive(Debug)]
pub struct Router {
    active: View,
}

impl Default for Router {
    fn default() -> Self {
        Self { active: View::History }
    }
}

impl Router {
    pub fn active(&self) -> View {
        self.active
    }

    /// Activate `view`. Showing the history or the charts always refetches
    /// the records, even when the view is already active; showing the entry
    /// form refreshes its date to today.
    pub fn show(&mut self, view: View) -> ViewEffect {
        self.active = view;
        match view {
            View::History | View::Charts => ViewEffect::ReloadHistory,
            View::Entry => ViewEffect::ResetDate,
        }
    }

    pub fn next(&self) -> View {
        let idx = View::ALL.iter().position(|v| *v == self.active).unwrap_or(0);
        View::ALL[(idx + 1) % View::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_history() {
        assert_eq!(Router::default().active(), View::History);
    }

    #[test]
    fn test_show_effects() {
        let mut router = Router::default();
        assert_eq!(router.show(View::Entry), ViewEffect::ResetDate);
        assert_eq!(router.active(), View::Entry);
        assert_eq!(router.show(View::Charts), ViewEffect::ReloadHistory);
        assert_eq!(router.show(View::History), ViewEffect::ReloadHistory);
        assert_eq!(router.show(View::History), ViewEffect::ReloadHistory);
    }

    #[test]
    fn test_next_cycles() {
        let mut router = Router::default();
        assert_eq!(router.next(), View::Charts);
        router.show(View::Charts);
        assert_eq!(router.next(), View::Entry);
    }
}
