use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::ChannelId;
use serenity::prelude::*;

use futurebot::core::Config;
use futurebot::database::Database;
use futurebot::features::reminders::{RemindHandler, ReminderScheduler};
use futurebot::sink::DiscordSink;

struct Handler {
    remind: RemindHandler,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        if !RemindHandler::is_remind_command(&msg.content) {
            return;
        }

        info!("Reminder request from user {}", msg.author.id);
        let reply = self
            .remind
            .handle(&msg.author.id.to_string(), &msg.content)
            .await;

        if let Err(why) = msg.channel_id.say(&ctx.http, reply).await {
            error!("Failed to send reply: {why}");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("*** FUTUREBOT STARTING ***");

    info!("Opening the database at {}...", config.database_path);
    let database = Database::new(&config.database_path).await?;

    let handler = Handler {
        remind: RemindHandler::new(database.clone()),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Start the delivery loop against the gateway's HTTP handle
    let sink = Arc::new(DiscordSink::new(
        client.cache_and_http.http.clone(),
        ChannelId(config.remind_channel_id),
    ));
    let scheduler = ReminderScheduler::new(
        database,
        sink,
        Duration::from_secs(config.poll_interval_secs),
    );
    tokio::spawn(async move {
        scheduler.run().await;
    });

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
