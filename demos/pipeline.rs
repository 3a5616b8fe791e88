//! Full pipeline demo: a simulated blocking broker client, flaky
//! remediation, deadline heartbeats, and graceful shutdown.
//!
//! Run with:
//! ```text
//! RUST_LOG=info cargo run --example pipeline
//! ```
//! then press Ctrl-C (or send SIGTERM/SIGHUP) and watch in-flight messages
//! get cancelled and drained before exit.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use conveyor::{
    BridgeQueue, Config, LogWriter, Message, MessageQueue, RemediationMode, SimProcessor,
    Subscribe, Supervisor,
};

/// Wraps the in-memory queue with the latency of a real blocking client.
struct SimulatedBrokerQueue {
    inner: BridgeQueue,
}

impl MessageQueue for SimulatedBrokerQueue {
    fn put(&self, msg: Message) {
        let delay = {
            let mut rng = rand::thread_rng();
            Duration::from_millis(rng.gen_range(100..1000))
        };
        std::thread::sleep(delay);
        self.inner.put(msg);
    }

    fn try_get(&self) -> Option<Message> {
        self.inner.try_get()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::default();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let supervisor = Supervisor::new(cfg, subs);

    let queue = Arc::new(SimulatedBrokerQueue {
        inner: BridgeQueue::new(),
    });
    let processor = Arc::new(
        SimProcessor::new(Duration::from_millis(800)).with_remediation(RemediationMode::Flaky),
    );

    supervisor.run(queue, processor).await?;
    Ok(())
}
