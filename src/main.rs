// Entry point for the routing daemon: loads a router's configuration,
// brings up its socket and state, and runs the HELLO/LSA/route machinery
// until killed.

use std::env;
use std::process::ExitCode;

use routingd::error::AppError;

fn parse_config_path(args: &[String]) -> Result<String, AppError> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            return iter
                .next()
                .cloned()
                .ok_or_else(|| AppError::ConfigError("--config requires a path argument".to_string()));
        }
    }
    Err(AppError::ConfigError("usage: routingd --config <path>".to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    routingd::init::init_logging_and_env();

    let args: Vec<String> = env::args().skip(1).collect();
    let config_path = match parse_config_path(&args) {
        Ok(path) => path,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&config_path).await {
        log::error!("fatal: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config_path: &str) -> routingd::error::Result<()> {
    let config = routingd::read_config::read_router_config(config_path)?;
    let port = config.port;
    let router_id = config.router_id.clone();
    let state = routingd::init::init_state(config);
    let socket = routingd::init::init_socket(port).await?;

    log::info!("router {} listening on 0.0.0.0:{}", router_id, port);

    routingd::tasks::spawn_hello_and_lsa_tasks(socket.clone(), state.clone());
    routingd::tasks::spawn_neighbor_timeout_task(socket.clone(), state.clone());

    {
        let socket = socket.clone();
        let state = state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            routingd::flood::advertise_links(&socket, &state).await.ok();
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            routingd::tasks::reinstall_known_routes(&socket, &state).await;
        });
    }

    routingd::packet_loop::main_loop(socket, state).await
}
