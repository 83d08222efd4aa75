use crate::config::join_url;
use crate::domain::ports::Navigator;

/// Announces the redirect on stdout; a terminal has no page to load.
pub struct ConsoleNavigator {
    base_url: String,
}

impl ConsoleNavigator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, route: &str) -> String {
        join_url(&self.base_url, route)
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        println!("Redirecting to {}", self.url_for(route));
    }
}
