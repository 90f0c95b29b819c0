use std::sync::Arc;

use crate::commands::{build_runtime, CommandResult};
use stocky_agent::{AgentRuntime, OpenAiCompatClient, ToolRegistry};
use stocky_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use stocky_db::{connect_with_settings, migrations};

pub fn run(question: &str, max_iterations: Option<u32>) -> CommandResult {
    let options = LoadOptions {
        overrides: ConfigOverrides { max_iterations, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    init_logging(&config);

    let Some(api_key) = config.llm.api_key.clone() else {
        return CommandResult::failure(
            "ask",
            "config_validation",
            "llm.api_key is required to run the agent",
            2,
        );
    };

    let client = match OpenAiCompatClient::new(
        &config.llm.base_url,
        api_key,
        &config.llm.model,
        config.llm.timeout_secs,
    ) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "llm_client_init",
                format!("failed to build completion client: {error}"),
                3,
            );
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let agent = AgentRuntime::new(
            Arc::new(client),
            ToolRegistry::with_default_tools(pool),
            config.agent.max_iterations,
        );

        agent
            .answer(question)
            .await
            .map_err(|error| ("agent_loop", error.to_string(), 6u8))
    });

    match result {
        Ok(answer) => CommandResult::success("ask", answer),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("ask", error_class, message, exit_code)
        }
    }
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);

    // try_init: `ask` may run after another command already installed a
    // subscriber in the same process (tests).
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
