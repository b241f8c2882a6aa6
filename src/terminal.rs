//! Terminal mode setup and restore.
//!
//! The release build aborts on panic, so `Drop` never runs there. The panic
//! hook installed by [`TerminalGuard::install_panic_hook`] restores the
//! terminal before the previous hook prints the message.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

pub trait TerminalOps: Send + Sync + 'static {
    fn setup(&self) -> io::Result<()>;
    fn restore(&self) -> io::Result<()>;
}

/// Raw mode, alternate screen and mouse capture on stdout.
#[derive(Debug, Default)]
pub struct CrosstermTerminalOps;

impl TerminalOps for CrosstermTerminalOps {
    fn setup(&self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
    }

    fn restore(&self) -> io::Result<()> {
        // every step runs even if an earlier one fails
        let raw = disable_raw_mode();
        let screen = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
        raw.and(screen)
    }
}

/// Restores the terminal at most once, whoever calls first.
#[derive(Clone)]
pub struct TerminalRestorer {
    restored: Arc<AtomicBool>,
    ops: Arc<dyn TerminalOps>,
}

impl TerminalRestorer {
    pub fn restore(&self) -> io::Result<()> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.ops.restore()
    }
}

/// Puts the terminal in TUI mode until dropped.
pub struct TerminalGuard {
    restorer: TerminalRestorer,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        Self::with_ops(Arc::new(CrosstermTerminalOps))
    }

    pub fn with_ops(ops: Arc<dyn TerminalOps>) -> io::Result<Self> {
        ops.setup()?;
        Ok(Self {
            restorer: TerminalRestorer {
                restored: Arc::new(AtomicBool::new(false)),
                ops,
            },
        })
    }

    pub fn restorer(&self) -> TerminalRestorer {
        self.restorer.clone()
    }

    /// Chains a hook that restores the terminal in front of the current one.
    pub fn install_panic_hook(&self) {
        let restorer = self.restorer();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restorer.restore();
            previous(panic_info);
        }));
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restorer.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOps {
        calls: Mutex<Vec<&'static str>>,
    }

    impl TerminalOps for RecordingOps {
        fn setup(&self) -> io::Result<()> {
            self.calls.lock().unwrap().push("setup");
            Ok(())
        }

        fn restore(&self) -> io::Result<()> {
            self.calls.lock().unwrap().push("restore");
            Ok(())
        }
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let ops = Arc::new(RecordingOps::default());
        {
            let _guard = TerminalGuard::with_ops(ops.clone()).unwrap();
        }
        assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
    }

    #[test]
    fn test_restorer_runs_once() {
        let ops = Arc::new(RecordingOps::default());
        let guard = TerminalGuard::with_ops(ops.clone()).unwrap();
        let restorer = guard.restorer();

        restorer.restore().unwrap();
        restorer.restore().unwrap();
        drop(guard);

        assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
    }

    #[test]
    fn test_panic_hook_restores_terminal() {
        let ops = Arc::new(RecordingOps::default());
        let guard = TerminalGuard::with_ops(ops.clone()).unwrap();
        guard.install_panic_hook();

        let result = std::panic::catch_unwind(|| {
            panic!("boom");
        });
        let _ = std::panic::take_hook();

        assert!(result.is_err());
        assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
        drop(guard);
        assert_eq!(ops.calls.lock().unwrap().len(), 2);
    }
}
