use crate::cli::CallArgs;
use crate::config::ProjectConfig;
use colored::Colorize;
use stockroom::{InventoryModule, Reply, Request, TracedClient};

pub async fn run(cfg: &ProjectConfig, args: CallArgs) -> anyhow::Result<()> {
    let url = cfg.database_url(args.global.database.as_deref())?;
    let pool = stockroom::create_pool_with_config(&url, cfg.file.database.pool_size)?;
    let client = pool
        .get()
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;

    let traced = TracedClient::new(client).level(cfg.file.log.sql_level()?);
    let module = InventoryModule::new(traced)?.with_limits(cfg.file.inventory.limits());

    let request = Request {
        method: args.method,
        path: args.path,
        query: args.query,
        body: args.body,
    };
    let reply = module.dispatch(&request).await;
    let _client = module.shutdown();

    print_reply(&request, &reply)?;
    if !reply.is_success() {
        anyhow::bail!("request failed with status {}", reply.status);
    }
    Ok(())
}

fn print_reply(request: &Request, reply: &Reply) -> anyhow::Result<()> {
    let status = reply.status.to_string();
    let status = if reply.is_success() {
        status.green().bold()
    } else {
        status.red().bold()
    };
    println!(
        "{status} {} {}",
        request.method.to_ascii_uppercase(),
        request.path
    );
    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    Ok(())
}
