/// Screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Keywords,
    Chats,
    Settings,
}

impl View {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Some(View::Dashboard),
            "keywords" => Some(View::Keywords),
            "chats" => Some(View::Chats),
            "settings" => Some(View::Settings),
            _ => None,
        }
    }
}

/// Picks the active screen. Without an endpoint every request resolves to
/// [`View::Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    requested: View,
}

impl ViewRouter {
    pub fn new(configured: bool) -> Self {
        let requested = if configured {
            View::Dashboard
        } else {
            View::Settings
        };
        Self { requested }
    }

    pub fn navigate(&mut self, view: View) {
        self.requested = view;
    }

    pub fn endpoint_saved(&mut self) {
        self.requested = View::Dashboard;
    }

    pub fn bootstrap_failed(&mut self) {
        self.requested = View::Settings;
    }

    pub fn current(&self, configured: bool) -> View {
        if configured {
            self.requested
        } else {
            View::Settings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_view_depends_on_configuration() {
        assert_eq!(ViewRouter::new(false).current(false), View::Settings);
        assert_eq!(ViewRouter::new(true).current(true), View::Dashboard);
    }

    #[test]
    fn unconfigured_overrides_navigation() {
        let mut router = ViewRouter::new(false);
        router.navigate(View::Chats);
        assert_eq!(router.current(false), View::Settings);
        assert_eq!(router.current(true), View::Chats);
    }

    #[test]
    fn save_and_failure_force_views() {
        let mut router = ViewRouter::new(true);
        router.bootstrap_failed();
        assert_eq!(router.current(true), View::Settings);
        router.endpoint_saved();
        assert_eq!(router.current(true), View::Dashboard);
    }

    #[test]
    fn parses_view_names() {
        assert_eq!(View::parse(" Keywords "), Some(View::Keywords));
        assert_eq!(View::parse("stats"), None);
    }
}
