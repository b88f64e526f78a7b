// Application configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

pub const DEFAULT_MAIL_SENDER: &str = "No Reply gonawin <no-reply@gonawin.com>";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Sender of invite mails.
    pub mail_sender: String,
    /// How often the task worker drains the queue.
    pub task_poll: Duration,
    /// Usernames that get the admin role when they register.
    pub admin_usernames: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite:gonawin.db?mode=rwc".to_string(),
            port: 3000,
            mail_sender: DEFAULT_MAIL_SENDER.to_string(),
            task_poll: Duration::from_millis(500),
            admin_usernames: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:gonawin.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `MAIL_SENDER` - From line of invite mails
    /// - `TASK_POLL_MS` - Task worker poll interval in ms (default: 500)
    /// - `ADMIN_USERNAMES` - Comma list of usernames registered as admins
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let defaults = Config::default();

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.port);

        let mail_sender = std::env::var("MAIL_SENDER").unwrap_or(defaults.mail_sender);

        let task_poll = std::env::var("TASK_POLL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.task_poll);

        let admin_usernames = std::env::var("ADMIN_USERNAMES")
            .map(|v| Self::parse_list(&v))
            .unwrap_or_default();

        Config {
            database_url,
            port,
            mail_sender,
            task_poll,
            admin_usernames,
        }
    }

    pub fn is_admin_username(&self, username: &str) -> bool {
        self.admin_usernames.iter().any(|u| u == username)
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }

    fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_value() {
        let args: Vec<String> = ["gonawin", "--port", "8080"].iter().map(|s| s.to_string()).collect();
        assert_eq!(Config::parse_cli_value(&args, "--port").as_deref(), Some("8080"));
        assert_eq!(Config::parse_cli_value(&args, "--host"), None);
    }

    #[test]
    fn test_admin_usernames() {
        let config = Config {
            admin_usernames: Config::parse_list(" root, ana ,,"),
            ..Config::default()
        };
        assert_eq!(config.admin_usernames, vec!["root", "ana"]);
        assert!(config.is_admin_username("ana"));
        assert!(!config.is_admin_username("bob"));
    }
}
