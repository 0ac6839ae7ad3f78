use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};

use crate::config::MixerConfig;
use crate::engine::Mixer;
use crate::ledger::{Ledger, PassReport};

/// The sweeper and withdrawal threads. Each waits out its interval, then runs one full pass
/// while holding the ledger lock. Dropping or shutting down stops both between passes.
pub struct Workers {
    stop: Option<Sender<()>>,
    handles: Vec<JoinHandle<()>>,
}

impl Workers {
    pub fn start(mixer: &Mixer, config: &MixerConfig) -> io::Result<Self> {
        // Never sent on; dropping the sender disconnects every receiver at once.
        let (stop, stop_rx) = bounded::<()>(0);

        let handles = vec![
            spawn_worker(
                "sweeper",
                mixer,
                config.sweep_interval,
                stop_rx.clone(),
                Ledger::sweep_pass,
            )?,
            spawn_worker(
                "withdrawer",
                mixer,
                config.withdraw_interval,
                stop_rx,
                Ledger::withdraw_pass,
            )?,
        ];

        Ok(Self {
            stop: Some(stop),
            handles,
        })
    }

    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.take();
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                error!("{} thread panicked", name);
            }
        }
    }
}

impl Drop for Workers {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn spawn_worker(
    name: &'static str,
    mixer: &Mixer,
    interval: Duration,
    stop: Receiver<()>,
    pass: fn(&mut Ledger) -> PassReport,
) -> io::Result<JoinHandle<()>> {
    let mixer = mixer.clone();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || run_worker(name, &mixer, interval, &stop, pass))
}

fn run_worker(
    name: &str,
    mixer: &Mixer,
    interval: Duration,
    stop: &Receiver<()>,
    pass: fn(&mut Ledger) -> PassReport,
) {
    info!("{} started, interval {:?}", name, interval);

    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let report = mixer.with_ledger(pass);
        if report.coins_moved > 0 {
            info!(
                "{} pass moved {} coins for {} deposits",
                name, report.coins_moved, report.deposits_touched
            );
        } else {
            debug!("{} pass idle ({} delayed)", name, report.delayed);
        }
    }

    info!("{} stopped", name);
}
