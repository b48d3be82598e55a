use tracing_subscriber::EnvFilter;
use weather_agent::config::Config;
use weather_agent::notify::{AssistantMessage, ChannelNotifier};
use weather_agent::Agent;

const QUERY: &str = "What's the weather like in Paris? and What's the forecast for Tokyo for the next 5 days? and How hot will it be in New York tomorrow?";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let mut agent = Agent::new(config.client());
    if let Some(max) = config.max_iterations {
        agent = agent.with_max_iterations(max);
    }

    // Print assistant turns as they arrive.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<AssistantMessage>();
    let listener = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            println!("> assistant: {}", serde_json::to_string(&message.content).unwrap_or_default());
        }
    });

    println!("Starting weather queries...\n");
    let notifier = ChannelNotifier::new(tx);
    let outcome = agent.run_notified(QUERY, &notifier).await?;
    drop(notifier);
    listener.await?;

    println!("\nWeather Results:");
    for result in &outcome.tool_results {
        println!("{}", serde_json::to_string_pretty(result)?);
    }

    println!("\nSummary:");
    println!("{}", outcome.summary);

    if let Some(error) = &outcome.error {
        println!("\nTool error: {}", error);
    }

    println!("\nTool Execution Log:");
    println!("{}", serde_json::to_string_pretty(&outcome.response.content)?);

    Ok(())
}
