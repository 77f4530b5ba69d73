// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use flume::{RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

pub type ServerTask = Arc<dyn Fn() + Send + Sync>;

/// Runs a task on a named background thread every `period` until stopped.
pub struct PeriodicTasks {
    thread_name: String,
    task: ServerTask,
    running: Option<(Sender<()>, JoinHandle<()>)>,
}

impl PeriodicTasks {
    pub fn new(thread_name: &str, task: ServerTask) -> Self {
        Self {
            thread_name: thread_name.to_string(),
            task,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// (Re)start the timer. `None` leaves it stopped. The first run happens one period from now.
    pub fn start(&mut self, period: Option<Duration>) {
        self.stop();
        let Some(period) = period else {
            return;
        };

        let (stop_send, stop_receive) = flume::bounded::<()>(1);
        let task = self.task.clone();
        let spawned = std::thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || {
                loop {
                    match stop_receive.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => task(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            });
        match spawned {
            Ok(handle) => {
                info!(thread = %self.thread_name, ?period, "Server task timer started");
                self.running = Some((stop_send, handle));
            }
            Err(e) => error!(thread = %self.thread_name, "Unable to spawn server task thread: {}", e),
        }
    }

    pub fn stop(&mut self) {
        let Some((stop_send, handle)) = self.running.take() else {
            return;
        };
        let _ = stop_send.send(());
        if handle.join().is_err() {
            error!(thread = %self.thread_name, "Server task thread panicked");
        }
        info!(thread = %self.thread_name, "Server task timer stopped");
    }
}

impl Drop for PeriodicTasks {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    fn counting() -> (PeriodicTasks, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = count.clone();
        let tasks = PeriodicTasks::new(
            "test-tasks",
            Arc::new(move || {
                task_count.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (tasks, count)
    }

    #[test]
    fn test_runs_until_stopped() {
        let (mut tasks, count) = counting();
        tasks.start(Some(Duration::from_millis(10)));
        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        tasks.stop();
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 3);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert!(!tasks.is_running());
    }

    #[test]
    fn test_disabled_period_never_runs() {
        let (mut tasks, count) = counting();
        tasks.start(None);
        assert!(!tasks.is_running());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
