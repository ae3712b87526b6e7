//! Background runner for API calls
//!
//! Owns a small tokio runtime. Jobs run there and report back over a
//! channel the UI drains on every tick, so the draw loop never blocks on
//! the network.

use super::Effect;
use crate::api::Navigator;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

pub struct ApiRunner {
    runtime: tokio::runtime::Runtime,
    tx: Sender<Effect>,
    rx: Receiver<Effect>,
    in_flight: Arc<AtomicUsize>,
}

impl ApiRunner {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("node-api")
            .enable_all()
            .build()
            .context("failed to start the HTTP runtime")?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            runtime,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Sender for effects produced outside of a job (navigator callbacks)
    pub fn sender(&self) -> Sender<Effect> {
        self.tx.clone()
    }

    /// Run `job` in the background; its effects show up in [`poll`](Self::poll)
    pub fn spawn<F>(&self, label: &'static str, job: F)
    where
        F: Future<Output = Vec<Effect>> + Send + 'static,
    {
        let tx = self.tx.clone();
        let in_flight = self.in_flight.clone();
        in_flight.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(job = label, "spawning api job");

        self.runtime.spawn(async move {
            let effects = job.await;
            for effect in effects {
                if tx.send(effect).is_err() {
                    tracing::debug!(job = label, "ui gone, dropping effects");
                    break;
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Drain every effect that arrived since the last call
    pub fn poll(&self) -> Vec<Effect> {
        let mut effects = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(effect) => effects.push(effect),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        effects
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Navigator that forwards the client's UI requests as effects
pub struct ChannelNavigator {
    tx: Sender<Effect>,
    on_login_page: Arc<AtomicBool>,
}

impl ChannelNavigator {
    /// `on_login_page` is kept current by the app whenever the route changes
    pub fn new(tx: Sender<Effect>, on_login_page: Arc<AtomicBool>) -> Self {
        Self { tx, on_login_page }
    }

    fn emit(&self, effect: Effect) {
        if self.tx.send(effect).is_err() {
            tracing::debug!("ui gone, dropping navigation effect");
        }
    }
}

impl Navigator for ChannelNavigator {
    fn on_login_page(&self) -> bool {
        self.on_login_page.load(Ordering::SeqCst)
    }

    fn alert(&self, message: &str) {
        self.emit(Effect::Alert(message.to_string()));
    }

    fn back(&self) {
        self.emit(Effect::Back);
    }

    fn session_expired(&self, message: &str) {
        self.emit(Effect::SessionExpired(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(runner: &ApiRunner, count: usize) -> Vec<Effect> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut effects = Vec::new();
        while effects.len() < count && Instant::now() < deadline {
            effects.extend(runner.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        effects
    }

    #[test]
    fn test_job_effects_arrive_in_order() {
        let runner = ApiRunner::new().unwrap();
        runner.spawn("test", async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            vec![Effect::Notice("one".to_string()), Effect::Back]
        });

        let effects = wait_for(&runner, 2);

        assert_eq!(effects, vec![Effect::Notice("one".to_string()), Effect::Back]);
        let deadline = Instant::now() + Duration::from_secs(1);
        while runner.is_busy() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!runner.is_busy());
    }

    #[test]
    fn test_navigator_forwards_as_effects() {
        let runner = ApiRunner::new().unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let navigator = ChannelNavigator::new(runner.sender(), flag.clone());

        assert!(navigator.on_login_page());
        flag.store(false, Ordering::SeqCst);
        assert!(!navigator.on_login_page());

        navigator.alert("Insufficient privileges");
        navigator.back();
        navigator.session_expired("bye");

        assert_eq!(
            runner.poll(),
            vec![
                Effect::Alert("Insufficient privileges".to_string()),
                Effect::Back,
                Effect::SessionExpired("bye".to_string()),
            ]
        );
    }
}
