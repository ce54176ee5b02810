use warden_supervisor::{platform_reclaimer, reclaim, WardenConfig};
use warden_types::WardenResult;

pub async fn run_reclaim(config: &WardenConfig) -> WardenResult<()> {
    let reclaimer = platform_reclaimer(config.backend.reclaimable_process_name());

    println!("\x1b[38;5;226m[*]\x1b[0m Reclaiming port {}...", config.supervisor.port);
    let terminated = reclaim(
        reclaimer.as_ref(),
        config.supervisor.port,
        config.supervisor.settle_delay(),
    )
    .await;

    if terminated > 0 {
        println!("\x1b[38;5;46m[+]\x1b[0m Terminated {} stale process(es)", terminated);
    } else {
        println!("\x1b[38;5;245mNothing to reclaim\x1b[0m");
    }
    Ok(())
}
