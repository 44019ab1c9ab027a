//! Ctrl-C handling for in-flight council runs

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels a token when Ctrl-C is pressed, for as long as the guard lives
pub struct CtrlCGuard {
    token: CancellationToken,
    watcher: JoinHandle<()>,
}

impl CtrlCGuard {
    /// Start watching for Ctrl-C. Must be called inside a tokio runtime.
    pub fn install() -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });
        Self { token, watcher }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for CtrlCGuard {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
