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

//! Drive a running recommendation server from the command line: lifecycle commands go to the
//! control socket, queries go over an authenticated service session.

use clap::Parser;
use clap_derive::{Parser as DeriveParser, Subcommand};
use eyre::bail;
use rpc_common::client_args::RpcClientArgs;
use rpc_common::request_builders::*;
use rpc_common::{ControlCommand, Registry, Request};
use rpc_sync_client::{SocketWrapper, connect_service};
use std::time::Duration;
use tracing::debug;

#[derive(DeriveParser, Debug)]
#[command(name = "reco-ctl")]
#[command(about = "Control and query a recommendation server", long_about = None)]
struct Args {
    #[command(flatten)]
    client: RpcClientArgs,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the server.
    Start,
    /// Stop the server.
    Stop,
    /// Pause a started server.
    Pause,
    /// Resume a paused server.
    Resume,
    /// Shut the server down for good.
    Exit,
    /// List known user ids.
    Users,
    /// List known item ids.
    Items,
    /// Show one user's ratings.
    UserRating { user_id: i32 },
    /// Recommend items for a stored user.
    Recommend {
        user_id: i32,
        #[arg(long, default_value = "10", help = "Most items to return; 0 for all")]
        max: i32,
    },
    /// Show the server's data configuration.
    Config,
    /// Show a snapshot of the stored data.
    Snapshot,
    /// List the evaluators the server hosts.
    Evaluators,
    /// Read an attribute of this session.
    Attribute { name: String },
}

impl Command {
    fn control_command(&self) -> Option<ControlCommand> {
        match self {
            Command::Start => Some(ControlCommand::Start),
            Command::Stop => Some(ControlCommand::Stop),
            Command::Pause => Some(ControlCommand::Pause),
            Command::Resume => Some(ControlCommand::Resume),
            Command::Exit => Some(ControlCommand::Exit),
            _ => None,
        }
    }

    fn request(&self) -> Option<Request> {
        Some(match self {
            Command::Users => mk_get_user_ids_request(),
            Command::Items => mk_get_item_ids_request(),
            Command::UserRating { user_id } => mk_get_user_rating_request(*user_id),
            Command::Recommend { user_id, max } => mk_recommend_user_request(*user_id, *max),
            Command::Config => mk_get_server_config_request(),
            Command::Snapshot => mk_get_snapshot_request(),
            Command::Evaluators => mk_get_evaluator_names_request(),
            Command::Attribute { name } => mk_get_session_attribute_request(name),
            _ => return None,
        })
    }
}

fn control(client: &RpcClientArgs, command: ControlCommand) -> Result<(), eyre::Report> {
    let wrapper = SocketWrapper::new(
        &client.control_address,
        Duration::from_secs(client.timeout_secs),
    );
    if !wrapper.control(command, &client.account, &client.password)? {
        bail!("Server refused {command} for account {}", client.account);
    }
    println!("{command}: ok");
    Ok(())
}

fn query(client: &RpcClientArgs, request: Request) -> Result<(), eyre::Report> {
    let service = connect_service(&client.connect_info(), &Registry::new())?;
    debug!(action = %request.action(), "Sending request");
    let result = service.call(request).and_then(|r| r.into_result());
    service.close();
    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    let args = Args::parse();
    reco_common::tracing::init_tracing_simple(args.debug)?;

    if let Some(command) = args.command.control_command() {
        return control(&args.client, command);
    }
    match args.command.request() {
        Some(request) => query(&args.client, request),
        None => bail!("Nothing to do for {:?}", args.command),
    }
}
