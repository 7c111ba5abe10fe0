use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use console_core::validate_robot_name;
use console_engine::{
    ChartRepository, Configuration, ConfigurationService, NewRobot, ReqwestRegistryClient, RobotAccess,
    RobotRepository,
};
use console_logging::console_info;
use serde_json::Value;

use super::settings::ConsoleSettings;
use super::ui::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PingTarget {
    Mail,
    Ldap,
    Oidc,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print every system setting
    Show,
    /// Change one setting; the value is read as JSON, falling back to a string
    Set { key: String, value: String },
    /// Test connectivity of a mail, LDAP or OIDC server
    Ping {
        target: PingTarget,
        /// Server settings as a JSON object
        #[arg(long, default_value = "{}")]
        settings: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RobotCommand {
    /// List robot accounts of a project
    List {
        #[arg(short, long)]
        project: i64,
    },
    Get {
        #[arg(short, long)]
        project: i64,
        id: i64,
    },
    /// Create a robot account and print its token
    Create {
        #[arg(short, long)]
        project: i64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Unix timestamp; omitted means the server default
        #[arg(long)]
        expires_at: Option<i64>,
        /// Grant pull on the project's repositories
        #[arg(long)]
        pull: bool,
        /// Grant push on the project's repositories
        #[arg(long)]
        push: bool,
    },
    Delete {
        #[arg(short, long)]
        project: i64,
        id: i64,
    },
    Enable {
        #[arg(short, long)]
        project: i64,
        id: i64,
    },
    Disable {
        #[arg(short, long)]
        project: i64,
        id: i64,
    },
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building async runtime")
}

fn client(settings: &ConsoleSettings) -> anyhow::Result<ReqwestRegistryClient> {
    ReqwestRegistryClient::new(settings.client_settings()).context("invalid registry settings")
}

pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub(crate) fn robot_access(project: i64, pull: bool, push: bool) -> Vec<RobotAccess> {
    let resource = format!("/project/{project}/repository");
    [("pull", pull), ("push", push)]
        .into_iter()
        .filter(|(_, granted)| *granted)
        .map(|(action, _)| RobotAccess {
            resource: resource.clone(),
            action: action.to_string(),
        })
        .collect()
}

pub fn run_config(settings: &ConsoleSettings, command: ConfigCommand) -> anyhow::Result<()> {
    let client = client(settings)?;
    runtime()?.block_on(async move {
        match command {
            ConfigCommand::Show => {
                let config = client
                    .get_configuration()
                    .await
                    .context("reading configuration")?;
                println!("{}", render::render_configuration(&config));
            }
            ConfigCommand::Set { key, value } => {
                let mut changes = Configuration::new();
                changes.insert(key.clone(), parse_value(&value));
                client
                    .save_configuration(&changes)
                    .await
                    .with_context(|| format!("saving {key}"))?;
                console_info!("Configuration key {} updated", key);
                println!("{key} updated");
            }
            ConfigCommand::Ping { target, settings } => {
                let body: Value =
                    serde_json::from_str(&settings).context("--settings must be a JSON object")?;
                if !body.is_object() {
                    bail!("--settings must be a JSON object");
                }
                let result = match target {
                    PingTarget::Mail => client.test_mail_server(&body).await,
                    PingTarget::Ldap => client.test_ldap_server(&body).await,
                    PingTarget::Oidc => client.test_oidc_server(&body).await,
                };
                result.with_context(|| format!("{target:?} server test failed"))?;
                println!("{target:?} server reachable");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

pub fn run_robots(settings: &ConsoleSettings, command: RobotCommand) -> anyhow::Result<()> {
    let client = client(settings)?;
    runtime()?.block_on(async move {
        match command {
            RobotCommand::List { project } => {
                let robots = client.list_robots(project).await.context("listing robots")?;
                println!("{}", render::render_robots(&robots));
            }
            RobotCommand::Get { project, id } => {
                let robot = client
                    .get_robot(project, id)
                    .await
                    .with_context(|| format!("reading robot {id}"))?;
                println!("{}", render::render_robots(std::slice::from_ref(&robot)));
            }
            RobotCommand::Create {
                project,
                name,
                description,
                expires_at,
                pull,
                push,
            } => {
                validate_robot_name(&name)?;
                let access = robot_access(project, pull, push);
                if access.is_empty() {
                    bail!("grant at least one of --pull or --push");
                }
                let robot = NewRobot {
                    name,
                    description,
                    expires_at,
                    access,
                };
                let token = client
                    .create_robot(project, &robot)
                    .await
                    .context("creating robot")?;
                console_info!("Robot {} created in project {}", token.name, project);
                println!("{}\n{}", token.name, token.token);
            }
            RobotCommand::Delete { project, id } => {
                client
                    .delete_robot(project, id)
                    .await
                    .with_context(|| format!("deleting robot {id}"))?;
                println!("robot {id} deleted");
            }
            RobotCommand::Enable { project, id } => set_disabled(&client, project, id, false).await?,
            RobotCommand::Disable { project, id } => set_disabled(&client, project, id, true).await?,
        }
        Ok::<(), anyhow::Error>(())
    })
}

pub fn run_charts(settings: &ConsoleSettings, project: &str, chart: &str) -> anyhow::Result<()> {
    let client = client(settings)?;
    let versions = runtime()?
        .block_on(client.list_chart_versions(project, chart))
        .with_context(|| format!("listing versions of {project}/{chart}"))?;
    console_info!("{} versions of chart {}/{}", versions.len(), project, chart);
    println!("{}", render::render_chart_versions(&versions));
    Ok(())
}

async fn set_disabled(
    client: &ReqwestRegistryClient,
    project: i64,
    id: i64,
    disabled: bool,
) -> anyhow::Result<()> {
    client
        .toggle_disabled(project, id, disabled)
        .await
        .with_context(|| format!("updating robot {id}"))?;
    let state = if disabled { "disabled" } else { "enabled" };
    console_info!("Robot {} in project {} {}", id, project, state);
    println!("robot {id} {state}");
    Ok(())
}
