//! Caller-supplied callback seams for load diagnostics and update consent.

use crate::element::ElementNode;
use crate::errors::ArbResult;

/// Receives load-time diagnostics.
///
/// `log_message` accumulates warnings that do not stop the load;
/// `on_error` asks the caller whether a recoverable structural problem
/// (e.g. a newer-minor document version) should abort. Returning false
/// aborts.
pub trait ErrorCallback {
    fn log_message(&mut self, msg: &str);

    fn on_error(&mut self, _msg: &str) -> bool {
        false
    }
}

/// Buffer-collecting callback; the default for non-interactive callers.
#[derive(Debug, Default)]
pub struct ErrorLog {
    pub messages: String,
    /// Answer given by `on_error`.
    pub continue_on_error: bool,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerant() -> Self {
        Self {
            messages: String::new(),
            continue_on_error: true,
        }
    }
}

impl ErrorCallback for ErrorLog {
    fn log_message(&mut self, msg: &str) {
        self.messages.push_str(msg);
        if !msg.ends_with('\n') {
            self.messages.push('\n');
        }
    }

    fn on_error(&mut self, msg: &str) -> bool {
        self.log_message(msg);
        self.continue_on_error
    }
}

/// Consent/notification seam for the configuration update algorithm.
///
/// `pre_delete` announces a destructive action before it happens so an
/// interactive caller can veto it by making `can_continue` return
/// false. `post_delete` reports deletions that already happened.
pub trait ConfigActionCallback {
    fn pre_delete(&mut self, msg: &str);

    fn post_delete(&mut self, _msg: &str) {}

    fn can_continue(&self) -> bool {
        true
    }
}

/// Accepts every action; collects the delete notifications.
#[derive(Debug, Default)]
pub struct AcceptAllActions {
    pub pre_delete_messages: Vec<String>,
    pub post_delete_messages: Vec<String>,
}

impl ConfigActionCallback for AcceptAllActions {
    fn pre_delete(&mut self, msg: &str) {
        self.pre_delete_messages.push(msg.to_string());
    }

    fn post_delete(&mut self, msg: &str) {
        self.post_delete_messages.push(msg.to_string());
    }
}

/// Vetoes everything after the first destructive announcement.
#[derive(Debug, Default)]
pub struct DenyDeletes {
    announced: bool,
}

impl ConfigActionCallback for DenyDeletes {
    fn pre_delete(&mut self, _msg: &str) {
        self.announced = true;
    }

    fn can_continue(&self) -> bool {
        !self.announced
    }
}

/// Supplies the factory-default configuration tree for new documents.
pub trait ConfigHandler {
    fn load_default_config(&self) -> ArbResult<ElementNode>;
}
