//! Main application entry point for the Horizon command console
//!
//! Loads a world snapshot, registers the built-in commands and runs either a
//! single command given on the command line or every line read from stdin.

mod cli;
mod commands;
mod config;
mod logging;
mod signals;

use clap::Parser;
use horizon_command::{
    CommandError, CommandManager, CommandResult, CommandSource, ConsoleSource, EntityRegistry,
    EntitySource, WorldSnapshot,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use cli::CliArgs;
use config::AppConfig;

// ============================================================================
// World Loading
// ============================================================================

/// Loads the world snapshot, falling back to an empty world when there is none.
async fn load_world(path: &str) -> Result<EntityRegistry, Box<dyn std::error::Error>> {
    if path.is_empty() {
        return Ok(EntityRegistry::new());
    }

    let path = Path::new(path);
    if !path.exists() {
        warn!("World file {} not found, starting with an empty world", path.display());
        return Ok(EntityRegistry::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let snapshot = WorldSnapshot::from_json(&content)?;
    let registry = EntityRegistry::from_snapshot(snapshot);
    info!("🌍 Loaded {} entities from {}", registry.len(), path.display());
    Ok(registry)
}

fn select_source(
    act_as: Option<&str>,
    registry: Arc<EntityRegistry>,
) -> Result<Box<dyn CommandSource>, String> {
    match act_as {
        Some(name) => {
            let player = registry
                .find_player(name)
                .ok_or_else(|| format!("Player '{}' is not in the world", name))?;
            Ok(Box::new(EntitySource::new(player, registry)))
        }
        None => Ok(Box::new(ConsoleSource::new(registry))),
    }
}

// ============================================================================
// Output
// ============================================================================

fn render(outcome: &Result<CommandResult, CommandError>, json: bool) -> String {
    match (outcome, json) {
        (Ok(result), false) => result.messages.join("\n"),
        (Ok(result), true) => serde_json::json!({
            "success": true,
            "affected": result.affected,
            "messages": result.messages,
        })
        .to_string(),
        (Err(CommandError::Parse(err)), false) => {
            format!("{}\n{}", err, err.annotated_position())
        }
        (Err(CommandError::Parse(err)), true) => serde_json::json!({
            "success": false,
            "error": err.message(),
            "input": err.input(),
            "position": err.position(),
        })
        .to_string(),
        (Err(e), false) => e.to_string(),
        (Err(e), true) => serde_json::json!({
            "success": false,
            "error": e.to_string(),
        })
        .to_string(),
    }
}

// ============================================================================
// Application
// ============================================================================

/// Main application struct
pub struct Application {
    config: AppConfig,
    manager: CommandManager,
    source: Box<dyn CommandSource>,
}

impl Application {
    /// Loads configuration, world and commands
    pub async fn new(args: &CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = AppConfig::load_from_file(&args.config).await?;
        config.apply_overrides(args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {}", e).into());
        }

        logging::setup_logging(&config.logging)?;

        let registry = Arc::new(load_world(&config.console.world_file).await?);

        let manager = CommandManager::new();
        commands::register_builtin_commands(&manager, registry.clone())?;

        let source = select_source(config.console.act_as.as_deref(), registry)?;
        info!("Running commands as {}", source.name());

        Ok(Self {
            config,
            manager,
            source,
        })
    }

    /// Executes one line and prints the outcome. Returns whether it succeeded.
    fn execute_line(&self, line: &str) -> bool {
        let outcome = self.manager.process(self.source.as_ref(), line);
        let output = render(&outcome, self.config.console.json_output);

        match &outcome {
            Ok(_) => println!("{}", output),
            Err(e) => {
                warn!("Command '{}' failed: {}", line.trim(), e);
                println!("{}", output);
            }
        }
        outcome.is_ok()
    }

    /// Runs a single command, or reads commands from stdin until EOF or a signal
    pub async fn run(self, command: Option<String>) -> Result<bool, Box<dyn std::error::Error>> {
        if let Some(line) = command {
            return Ok(self.execute_line(&line));
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let shutdown = signals::wait_for_shutdown();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) if line.trim().is_empty() => continue,
                        Some(line) if line.trim() == "help" => {
                            for name in self.manager.commands() {
                                if let Some(spec) = self.manager.get(&name) {
                                    println!("/{} - {}", spec.usage(), spec.description());
                                }
                            }
                        }
                        Some(line) => {
                            self.execute_line(&line);
                        }
                        None => break,
                    }
                }
                received = &mut shutdown => {
                    info!("📡 Console stopped by {} signal", received?);
                    break;
                }
            }
        }

        info!("👋 Console closed");
        Ok(true)
    }
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let command = args.command_line();

    match Application::new(&args).await {
        Ok(app) => match app.run(command).await {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                error!("❌ Console error: {:?}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("❌ Failed to start console: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_command::ArgumentParseError;

    #[tokio::test]
    async fn test_load_world_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        tokio::fs::write(
            &path,
            r#"{ "entities": [ { "type": "player", "name": "Steve" }, { "type": "cow" } ] }"#,
        )
        .await
        .unwrap();

        let registry = load_world(path.to_str().unwrap()).await.unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.find_player("steve").is_some());
    }

    #[tokio::test]
    async fn test_load_world_missing_or_empty_path() {
        assert!(load_world("").await.unwrap().is_empty());
        assert!(load_world("definitely/not/here.json").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_world_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        tokio::fs::write(&path, r#"{ "entities": [ { "type": "dragon" } ] }"#)
            .await
            .unwrap();

        assert!(load_world(path.to_str().unwrap()).await.is_err());
    }

    #[test]
    fn test_select_source() {
        let registry = Arc::new(EntityRegistry::new());
        registry.spawn(horizon_command::Entity::player("Steve"));

        let console = select_source(None, registry.clone()).unwrap();
        assert_eq!(console.name(), "Console");

        let steve = select_source(Some("steve"), registry.clone()).unwrap();
        assert_eq!(steve.name(), "Steve");
        assert!(steve.entity().is_some());

        let missing = select_source(Some("Alex"), registry).err().unwrap();
        assert_eq!(missing, "Player 'Alex' is not in the world");
    }

    #[test]
    fn test_render_outcomes() {
        let ok: Result<CommandResult, CommandError> =
            Ok(CommandResult::success().affected(1).with_message("Steve"));
        assert_eq!(render(&ok, false), "Steve");

        let json: serde_json::Value = serde_json::from_str(&render(&ok, true)).unwrap();
        assert_eq!(json["affected"], 1);
        assert_eq!(json["messages"][0], "Steve");

        let parse: Result<CommandResult, CommandError> = Err(CommandError::Parse(
            ArgumentParseError::new("Unknown selector type '@x'", "select @x", 7),
        ));
        assert_eq!(
            render(&parse, false),
            "Unknown selector type '@x'\nselect @x\n       ^"
        );

        let json: serde_json::Value = serde_json::from_str(&render(&parse, true)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["position"], 7);

        let unknown: Result<CommandResult, CommandError> =
            Err(CommandError::UnknownCommand("fly".to_string()));
        assert_eq!(render(&unknown, false), "Unknown command: fly");
    }
}
