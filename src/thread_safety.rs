use std::sync::RwLock;
use std::thread::{self, ThreadId};

/// Records which thread counts as the game's main thread.
#[derive(Debug)]
pub struct ThreadAffinity {
    main: RwLock<ThreadId>,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Designates the calling thread.
    pub fn current() -> Self {
        Self::new(thread::current().id())
    }

    pub fn new(main: ThreadId) -> Self {
        Self {
            main: RwLock::new(main),
        }
    }

    pub fn set_main_thread(&self, main: ThreadId) {
        *self.main.write().unwrap_or_else(|e| e.into_inner()) = main;
    }

    pub fn main_thread(&self) -> ThreadId {
        *self.main.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread()
    }
}
