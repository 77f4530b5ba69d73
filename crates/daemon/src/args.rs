// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::accounts::AccountConfig;
use clap::builder::ValueHint;
use clap_derive::Parser;
use eyre::eyre;
use figment::Figment;
use figment::providers::{Format, Serialized, Yaml};
use reco_common::{Privileges, ServerConfig, ServicePorts};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the daemon needs to come up, as read from the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub accounts: Vec<AccountConfig>,
    /// Names of the evaluators to advertise.
    pub evaluators: Vec<String>,
    /// Start the server as soon as the listeners are up.
    pub auto_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            accounts: vec![],
            evaluators: vec![],
            auto_start: true,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Recommendation server daemon")]
pub struct Args {
    #[arg(
        long,
        value_name = "config",
        help = "Path to configuration (YAML) file to use, if any. If not specified, defaults are used.\
                Configuration file values can be overridden by command line arguments.",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[arg(long, value_name = "host", help = "Host name to bind the listeners to")]
    pub host: Option<String>,

    #[arg(
        long,
        value_name = "base-port",
        help = "Base port; the server port, and every other port derived from it"
    )]
    pub base_port: Option<u16>,

    #[arg(
        long,
        value_name = "socket-control-port",
        help = "Port for the control socket, overriding the one derived from the base port"
    )]
    pub socket_control_port: Option<u16>,

    #[arg(
        long,
        value_name = "seconds",
        help = "Seconds between periodic server tasks; 0 disables them"
    )]
    pub server_tasks_period: Option<u64>,

    #[arg(
        long,
        value_name = "seconds",
        help = "Seconds a socket session may sit idle before it is dropped; 0 disables the timeout"
    )]
    pub server_timeout: Option<u64>,

    #[arg(long, help = "Ask clients to poll for status rather than register listeners")]
    pub pull_mode_required: bool,

    #[arg(
        long,
        value_name = "name",
        help = "Name of an admin account to create at startup",
        requires = "admin_password"
    )]
    pub admin_account: Option<String>,

    #[arg(
        long,
        value_name = "password",
        env = "RECO_ADMIN_PASSWORD",
        help = "Password for --admin-account",
        requires = "admin_account"
    )]
    pub admin_password: Option<String>,

    #[arg(long, help = "Do not start the server until told to over the control socket")]
    pub no_auto_start: bool,

    #[arg(long, help = "Enable debug logging", default_value = "false")]
    pub debug: bool,
}

impl Args {
    fn merge_config(&self, mut config: DaemonConfig) -> DaemonConfig {
        let server = &mut config.server;
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(base_port) = self.base_port {
            server.ports = ServicePorts::from_base(base_port);
        }
        if let Some(port) = self.socket_control_port {
            server.ports.socket_control = port;
        }
        if let Some(period) = self.server_tasks_period {
            server.server_tasks_period = period;
        }
        if let Some(timeout) = self.server_timeout {
            server.server_timeout = timeout;
        }
        if self.pull_mode_required {
            server.pull_mode_required = true;
        }
        if let (Some(name), Some(password)) = (&self.admin_account, &self.admin_password) {
            config.accounts.retain(|a| &a.name != name);
            config.accounts.push(AccountConfig {
                name: name.clone(),
                password: password.clone(),
                privileges: Privileges::ADMIN | Privileges::EVALUATE,
            });
        }
        if self.no_auto_start {
            config.auto_start = false;
        }
        config
    }

    /// Load the configuration file if we have it, and then merge the arguments into it.
    pub fn load_config(&self) -> Result<DaemonConfig, eyre::Report> {
        let config = match &self.config_file {
            Some(config_path) => Figment::new()
                .merge(Serialized::defaults(DaemonConfig::default()))
                .merge(Yaml::file(config_path))
                .extract::<DaemonConfig>()
                .map_err(|e| {
                    eyre!(
                        "Failed to parse configuration from {:?}: {}",
                        config_path,
                        e
                    )
                })?,
            None => DaemonConfig::default(),
        };
        Ok(self.merge_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let args = Args::parse_from(["reco-daemon"]);
        let config = args.load_config().unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert!(config.auto_start);
        assert_eq!(config.server.ports.server, 10151);
    }

    #[test]
    fn test_file_then_arguments() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "server:\n  server_timeout: 60\n  ports:\n    server: 9000\naccounts:\n  - name: ann\n    password: pw\n    privileges: 1\nevaluators: [rmse, mae]\n"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = Args::parse_from([
            "reco-daemon",
            "--config-file",
            path.as_str(),
            "--server-tasks-period",
            "0",
            "--admin-account",
            "root",
            "--admin-password",
            "secret",
            "--no-auto-start",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.server.server_timeout, 60);
        assert_eq!(config.server.ports.server, 9000);
        // Unlisted ports keep their defaults.
        assert_eq!(config.server.ports.socket_control, 10156);
        assert_eq!(config.server.server_tasks_period, 0);
        assert_eq!(config.evaluators, vec!["rmse".to_string(), "mae".to_string()]);
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].privileges, Privileges::ACCESS);
        assert!(config.accounts[1].privileges.is_admin());
        assert!(!config.auto_start);
    }

    #[test]
    fn test_base_port_moves_every_port() {
        let args = Args::parse_from(["reco-daemon", "--base-port", "20000"]);
        let config = args.load_config().unwrap();
        assert_eq!(config.server.ports, ServicePorts::from_base(20000));
    }

    #[test]
    fn test_bad_file_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server: [not, a, map]").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = Args::parse_from(["reco-daemon", "--config-file", path.as_str()]);
        assert!(args.load_config().is_err());
    }
}
