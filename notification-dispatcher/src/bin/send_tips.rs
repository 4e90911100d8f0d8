use chrono::Timelike;
use clap::Parser;
use dotenv::dotenv;
use notification_dispatcher::{
    configs::{Command, DispatcherConfigs},
    dispatcher::Dispatcher,
    logging, tips,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let configs = DispatcherConfigs::parse();

    logging::init_logging(configs.log_level)?;

    let gcloud = configs.init_channel()?;
    info!("Using messaging endpoint {}", gcloud.url());
    if configs.validate_only {
        info!("Validate-only mode, no notification will be delivered.");
    }
    let dispatcher = Dispatcher::new(Arc::new(gcloud));

    match configs.command {
        Command::Demo(args) => {
            let hour = args.hour.unwrap_or_else(|| chrono::Local::now().hour());
            info!("Sending personalized notifications...");
            if let Err(e) = tips::run_demo(&dispatcher, &args.user(), hour).await {
                error!("Demo sequence aborted: {}", e);
                return Err(e.into());
            }
        }
        Command::Topic(args) => {
            let data = args.message.data()?;
            let result = dispatcher
                .send_to_topic(&args.topic, &args.message.title, &args.message.body, data)
                .await?;
            println!("{result}");
        }
        Command::User(args) => {
            let data = args.message.data()?;
            let result = dispatcher
                .send_to_user(&args.user_id, &args.message.title, &args.message.body, data)
                .await?;
            println!("{result}");
        }
    }
    Ok(())
}
